use thiserror::Error;

use crate::domain::repositories::StoreError;

/// Errors raised while building a report
///
/// The engine never recovers locally; both variants travel to the caller.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ReportResult<T> = Result<T, ReportError>;
