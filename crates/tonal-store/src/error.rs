//! Error types for variable stores and reconciliation.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::model::VariableType;

/// Errors raised by [`VariableStore`](crate::VariableStore) backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Collection identifier did not resolve.
    #[error("variable collection not found")]
    UnknownCollection {
        /// Missing collection identifier.
        collection_id: Uuid,
    },
    /// Variable identifier did not resolve.
    #[error("variable not found")]
    UnknownVariable {
        /// Missing variable identifier.
        variable_id: Uuid,
    },
    /// Mode does not belong to the variable's collection.
    #[error("mode not found in collection")]
    UnknownMode {
        /// Collection that was searched.
        collection_id: Uuid,
        /// Requested mode identifier.
        mode_id: Uuid,
    },
    /// A variable with the same name already exists in the collection.
    #[error("variable name already exists")]
    DuplicateName {
        /// Collection holding the existing variable.
        collection_id: Uuid,
        /// Conflicting variable name.
        name: String,
    },
    /// A collection with the same name already exists.
    #[error("collection name already exists")]
    DuplicateCollection {
        /// Conflicting collection name.
        name: String,
    },
    /// Value type did not match the variable's resolved type.
    #[error("variable value does not match its type")]
    TypeMismatch {
        /// Variable receiving the value.
        variable_id: Uuid,
        /// Type declared by the variable.
        expected: VariableType,
    },
    /// Operation is not supported by this backend.
    #[error("variable store operation not supported")]
    Unsupported {
        /// Operation identifier.
        operation: &'static str,
    },
    /// File system operation failed.
    #[error("variable store file operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Store document could not be encoded or decoded.
    #[error("variable store document is invalid")]
    Serialization {
        /// Operation identifier.
        operation: &'static str,
        /// Path of the document.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the [`VariableReconciler`](crate::VariableReconciler).
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No collection with the configured name exists.
    #[error("variable collection not found")]
    CollectionNotFound {
        /// Configured collection name.
        name: String,
    },
    /// The collection exists but declares no modes to read or write.
    #[error("variable collection has no modes")]
    MissingMode {
        /// Configured collection name.
        name: String,
    },
    /// The store rejected or failed an operation.
    #[error("variable reconciliation failed")]
    ReconciliationFailure {
        /// Operation identifier.
        operation: &'static str,
        /// Variable name involved, when applicable.
        name: Option<String>,
        /// Source store error.
        source: StoreError,
    },
    /// The store did not answer within the allotted time.
    #[error("variable store timed out")]
    Timeout {
        /// Operation identifier.
        operation: &'static str,
        /// Deadline that elapsed.
        timeout: Duration,
    },
}

/// Convenience alias for reconciliation results.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn reconciliation_failure_exposes_store_source() {
        let err = ReconcileError::ReconciliationFailure {
            operation: "upsert",
            name: Some("brand/500".to_string()),
            source: StoreError::Unsupported {
                operation: "set_value",
            },
        };
        assert_eq!(err.to_string(), "variable reconciliation failed");
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("variable store operation not supported")
        );
    }
}
