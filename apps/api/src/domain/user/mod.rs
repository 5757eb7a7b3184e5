// User domain module
// Accounts, roles and the permission matrix derived from them

#![allow(clippy::module_inception)]

pub mod role;
pub mod user;
pub mod value_objects;

pub use role::{Action, PermissionMatrix, Resource, Role};
pub use user::User;
pub use value_objects::Email;
