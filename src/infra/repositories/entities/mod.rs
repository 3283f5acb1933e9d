//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod email;
pub mod user;

#[allow(unused_imports)]
pub use email::{ActiveModel as EmailActiveModel, Entity as EmailEntity, Model as EmailModel};
#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
