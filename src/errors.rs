//! Unified application error type.
//! Every layer (pool, coordinator, repository, cli) returns AppError, so
//! callers never see the store's native error representation.

use std::io;
use thiserror::Error;

/// Closed set of store-agnostic failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Acquisition,
    Statement,
    DuplicateKey,
    NotFound,
    BusinessRule,
    Commit,
    Release,
    Cancelled,
    Config,
    Io,
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / configuration
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Connection provider
    // ---------------------------
    #[error("Could not acquire a connection: {0}")]
    Acquisition(String),

    #[error("Could not release connection: {0}")]
    Release(String),

    // ---------------------------
    // Statements (already translated)
    // ---------------------------
    #[error("Statement '{operation}' failed: {message}")]
    Statement {
        operation: String,
        sql: String,
        message: String,
    },

    #[error("Duplicate key in '{operation}': {message}")]
    DuplicateKey {
        operation: String,
        sql: String,
        message: String,
    },

    // ---------------------------
    // Caller-recoverable
    // ---------------------------
    #[error("Member not found: {0}")]
    NotFound(String),

    #[error("Business rule violated: {0}")]
    BusinessRule(String),

    // ---------------------------
    // Unit of work
    // ---------------------------
    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Transaction '{operation}' failed: {source}")]
    Transaction {
        operation: String,
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wrap `cause` as the failure of the unit of work named `operation`.
    pub fn transaction(operation: &str, cause: AppError) -> Self {
        AppError::Transaction {
            operation: operation.to_string(),
            source: Box::new(cause),
        }
    }

    /// Kind of the innermost cause. Transaction wrappers are transparent here.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Io(_) => ErrorKind::Io,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Acquisition(_) => ErrorKind::Acquisition,
            AppError::Release(_) => ErrorKind::Release,
            AppError::Statement { .. } => ErrorKind::Statement,
            AppError::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BusinessRule(_) => ErrorKind::BusinessRule,
            AppError::Commit(_) => ErrorKind::Commit,
            AppError::Cancelled => ErrorKind::Cancelled,
            AppError::Transaction { source, .. } => source.kind(),
        }
    }

    /// The original error, with every transaction wrapper peeled off.
    pub fn root_cause(&self) -> &AppError {
        match self {
            AppError::Transaction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_looks_through_transaction_wrappers() {
        let inner = AppError::NotFound("memberA".into());
        let wrapped = AppError::transaction("outer", AppError::transaction("inner", inner));

        assert_eq!(wrapped.kind(), ErrorKind::NotFound);
        assert!(matches!(wrapped.root_cause(), AppError::NotFound(id) if id == "memberA"));
    }

    #[test]
    fn wrapper_message_names_operation_and_cause() {
        let err = AppError::transaction(
            "account_transfer",
            AppError::BusinessRule("account 'ex' is blocked".into()),
        );
        let msg = err.to_string();
        assert!(msg.contains("account_transfer"));
        assert!(msg.contains("account 'ex' is blocked"));
    }

    #[test]
    fn store_failures_keep_their_kind() {
        let err = AppError::Statement {
            operation: "save".into(),
            sql: "INSERT".into(),
            message: "disk I/O error".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Statement);
        assert_eq!(err.root_cause().kind(), ErrorKind::Statement);
        assert_eq!(AppError::Commit("locked".into()).kind(), ErrorKind::Commit);
    }
}
