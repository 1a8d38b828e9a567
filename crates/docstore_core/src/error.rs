//! Error types for docstore operations.

use crate::entity::EntityId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when working with a store.
///
/// Every backend surfaces the same taxonomy so callers can react to
/// error kinds without knowing which engine is underneath.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested identifier is absent from the collection.
    #[error("unknown entity {id} in collection {collection}")]
    UnknownEntity {
        /// The collection that was searched.
        collection: &'static str,
        /// The identifier that was not found.
        id: EntityId,
    },

    /// An entity failed its declared-shape checks before a write.
    ///
    /// A validation failure is raised before any I/O, so it never
    /// leaves partial state in a backend.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the failure.
        message: String,
    },

    /// A typed reference could not be constructed from the given input.
    #[error("cannot convert to reference of {target}: {message}")]
    ReferenceConversion {
        /// Name of the target collection.
        target: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// A malformed identifier string.
    #[error("invalid identifier: {input:?}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
    },

    /// Stored data no longer matches the entity's declared shape.
    #[error("deserialization failed in collection {collection}: {message}")]
    Deserialization {
        /// The collection the document was read from.
        collection: &'static str,
        /// Description of the mismatch.
        message: String,
    },

    /// Transient medium failure (connection loss, timeout).
    ///
    /// Never retried internally; the caller decides on retry.
    #[error("backend unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// The backend declines to implement this operation.
    #[error("{operation} is not supported by the {backend} backend")]
    NotSupported {
        /// Name of the declining backend.
        backend: &'static str,
        /// Name of the declined operation.
        operation: &'static str,
    },
}

impl StoreError {
    /// Creates an unknown-entity error.
    pub fn unknown_entity(collection: &'static str, id: EntityId) -> Self {
        Self::UnknownEntity { collection, id }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a reference-conversion error.
    pub fn reference_conversion(target: &'static str, message: impl Into<String>) -> Self {
        Self::ReferenceConversion {
            target,
            message: message.into(),
        }
    }

    /// Creates an invalid-identifier error.
    pub fn invalid_identifier(input: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            input: input.into(),
        }
    }

    /// Creates a deserialization error.
    pub fn deserialization(collection: &'static str, message: impl Into<String>) -> Self {
        Self::Deserialization {
            collection,
            message: message.into(),
        }
    }

    /// Creates a backend-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a not-supported error.
    pub fn not_supported(backend: &'static str, operation: &'static str) -> Self {
        Self::NotSupported { backend, operation }
    }

    /// Returns true if the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownEntity { .. }
                | StoreError::Validation { .. }
                | StoreError::ReferenceConversion { .. }
                | StoreError::InvalidIdentifier { .. }
        )
    }

    /// Returns true if the error originated in the backend medium.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            StoreError::Deserialization { .. }
                | StoreError::Unavailable { .. }
                | StoreError::NotSupported { .. }
        )
    }
}
