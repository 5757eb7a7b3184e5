// Domain layer module exports
// Entities, value objects and repository ports; no infrastructure concerns

mod closed_enum;

pub mod asset;
pub mod employee;
pub mod ledger;
pub mod period;
pub mod repositories;
pub mod user;
