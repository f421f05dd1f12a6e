// ⚠️ Error taxonomy for the expense store
//
// Two kinds reach callers:
// - ValidationError: bad input, rejected before anything is written
// - StoreError::Storage: SQLite refused or could not be reached

use thiserror::Error;

// ============================================================================
// VALIDATION
// ============================================================================

/// Malformed or missing input at insertion or filter construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,

    #[error("`{0}` is not a valid non-negative amount")]
    InvalidAmount(String),

    #[error("`{0}` is not a valid YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("`{0}` is not a known category")]
    UnknownCategory(String),

    #[error("month {0} is outside 1-12")]
    InvalidMonth(u32),
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Data directory could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
