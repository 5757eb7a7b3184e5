//! Office management API library
//!
//! Domain model, record stores, the reporting engine and the HTTP surface
//! for managing employees, assets, expenses and income.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod reporting;
