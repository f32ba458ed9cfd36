//! Repository error types
//!
//! # Example
//!
//! ```rust
//! use phone_inventory::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::not_found("Phone", "42");
//! assert!(matches!(error.kind, RepositoryErrorKind::NotFound));
//! assert!(error.entity_id.is_some());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Listing a page of entities
    List,
    /// Counting entities
    Count,
    /// Finding a single entity by ID
    FindById,
    /// Creating a new entity
    Create,
    /// Updating an existing entity
    Update,
    /// Deleting an entity
    Delete,
    /// Connectivity check
    Ping,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Count => write!(f, "count"),
            Self::FindById => write!(f, "find_by_id"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Ping => write!(f, "ping"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Entity was not found
    NotFound,
    /// Failed to connect to database
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: RepositoryOperation) -> Self {
        self.operation = operation;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == RepositoryErrorKind::NotFound
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::Error;

        let kind = match &err {
            Error::RowNotFound => RepositoryErrorKind::NotFound,
            Error::PoolTimedOut => RepositoryErrorKind::Timeout,
            Error::Io(_) | Error::Tls(_) | Error::PoolClosed | Error::WorkerCrashed => {
                RepositoryErrorKind::ConnectionFailed
            }
            Error::Database(_) | Error::ColumnDecode { .. } | Error::Decode(_) => {
                RepositoryErrorKind::DatabaseError
            }
            _ => RepositoryErrorKind::Other,
        };

        Self::new(RepositoryOperation::FindById, kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_convenience() {
        let error = RepositoryError::not_found("Phone", "42");
        assert_eq!(error.operation, RepositoryOperation::FindById);
        assert!(error.is_not_found());
        assert_eq!(error.entity_type, Some("Phone".to_string()));
        assert_eq!(error.entity_id, Some("42".to_string()));
    }

    #[test]
    fn test_with_operation() {
        let error = RepositoryError::not_found("Phone", "42").with_operation(RepositoryOperation::Delete);
        assert_eq!(error.operation, RepositoryOperation::Delete);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_display_with_entity() {
        let error = RepositoryError::not_found("Phone", "42");
        assert_eq!(
            error.to_string(),
            "Repository not_found error during find_by_id: Entity not found [Phone: 42]"
        );
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::database_error(RepositoryOperation::Create, "insert failed");
        let display = error.to_string();
        assert!(display.contains("database_error"));
        assert!(display.contains("create"));
        assert!(!display.contains('['));
    }

    #[test]
    fn test_from_sqlx_error() {
        let error = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(error.kind, RepositoryErrorKind::Timeout);

        let error = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(error.is_not_found());

        let error = RepositoryError::from(sqlx::Error::PoolClosed);
        assert_eq!(error.kind, RepositoryErrorKind::ConnectionFailed);
    }
}
