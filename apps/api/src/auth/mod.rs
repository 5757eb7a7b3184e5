// Authentication and authorization
// Password hashing, JWT issuance, and the permission gate

pub mod jwt;
pub mod password;
pub mod permissions;
