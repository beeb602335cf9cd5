//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Code of the validation error raised when an identifier fails to parse.
pub const INVALID_ID: &str = "General.InvalidId";

/// Coarse classification of a [`DomainError`].
///
/// Higher layers map kinds onto transport semantics (HTTP status, UI severity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
}

/// Domain-level error.
///
/// Every variant carries a stable `code` (e.g. `"WorkOrder.AddBid"`) that other
/// layers key off of, plus a human-readable description. Business-rule
/// violations are always returned as values of this type, never panics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input (empty description, schedule date in the past, ...).
    #[error("validation failed [{code}]: {description}")]
    Validation {
        code: &'static str,
        description: String,
    },

    /// Operation incompatible with the current state.
    #[error("conflict [{code}]: {description}")]
    Conflict {
        code: &'static str,
        description: String,
    },

    /// A referenced sub-entity is absent.
    #[error("not found [{code}]: {description}")]
    NotFound {
        code: &'static str,
        description: String,
    },
}

impl DomainError {
    pub fn validation(code: &'static str, description: impl Into<String>) -> Self {
        Self::Validation {
            code,
            description: description.into(),
        }
    }

    pub fn conflict(code: &'static str, description: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            description: description.into(),
        }
    }

    pub fn not_found(code: &'static str, description: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { code, .. }
            | DomainError::Conflict { code, .. }
            | DomainError::NotFound { code, .. } => code,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            DomainError::Validation { description, .. }
            | DomainError::Conflict { description, .. }
            | DomainError::NotFound { description, .. } => description,
        }
    }
}
