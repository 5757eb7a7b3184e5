pub mod analytics;
pub mod assets;
pub mod auth;
pub mod employees;
pub mod expenses;
pub mod health;
pub mod income;
pub mod params;
