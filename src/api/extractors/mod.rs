//! Custom request extractors and field validators.

mod validated_json;
pub mod validators;

pub use validated_json::{field_errors, ValidatedJson, ValidatedPath, ValidatedQuery};
