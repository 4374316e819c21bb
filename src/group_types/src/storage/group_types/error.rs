//! Error types for group type operations.
//!
//! Reaching the per-project quota is not an error: lookups report it as
//! `Ok(None)`. Everything here is a genuine failure that the caller sees.

use std::fmt;

use super::mapping::ProjectId;

/// Result type for group type operations.
pub type GroupTypeResult<T> = std::result::Result<T, GroupTypeError>;

/// Errors that can occur while resolving or allocating group type indices.
#[derive(Debug)]
pub enum GroupTypeError {
    /// The mapping store could not be reached.
    StoreUnavailable {
        /// Description of the operation that failed.
        operation: String,
        /// The underlying error message.
        message: String,
    },

    /// A query against the mapping store failed.
    StoreQuery {
        /// Description of the operation that failed.
        operation: String,
        /// The project the query was scoped to.
        project_id: ProjectId,
        /// The underlying error message.
        message: String,
    },

    /// The store returned an index outside the quota range.
    InvalidIndex {
        /// The offending raw value.
        value: i64,
    },

    /// Configuration values are inconsistent.
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Serialization/deserialization error.
    Serde {
        /// Description of the error.
        message: String,
    },

    /// Team lookup or event emission failed.
    Notification {
        /// Description of the failure.
        message: String,
    },

    /// Generic internal error.
    Internal {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for GroupTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupTypeError::StoreUnavailable { operation, message } => {
                write!(f, "Mapping store unavailable during {}: {}", operation, message)
            }
            GroupTypeError::StoreQuery {
                operation,
                project_id,
                message,
            } => {
                write!(
                    f,
                    "Mapping store {} failed for project {}: {}",
                    operation, project_id, message
                )
            }
            GroupTypeError::InvalidIndex { value } => {
                write!(f, "Invalid group type index from store: {}", value)
            }
            GroupTypeError::InvalidConfig { message } => {
                write!(f, "Invalid group type configuration: {}", message)
            }
            GroupTypeError::Serde { message } => {
                write!(f, "Serialization error: {}", message)
            }
            GroupTypeError::Notification { message } => {
                write!(f, "Notification error: {}", message)
            }
            GroupTypeError::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for GroupTypeError {}

impl From<serde_json::Error> for GroupTypeError {
    fn from(e: serde_json::Error) -> Self {
        GroupTypeError::Serde {
            message: e.to_string(),
        }
    }
}

impl GroupTypeError {
    /// Create a store unavailability error.
    pub fn store_unavailable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        GroupTypeError::StoreUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a store query error.
    pub fn store_query(
        operation: impl Into<String>,
        project_id: ProjectId,
        message: impl Into<String>,
    ) -> Self {
        GroupTypeError::StoreQuery {
            operation: operation.into(),
            project_id,
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        GroupTypeError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a notification error.
    pub fn notification(message: impl Into<String>) -> Self {
        GroupTypeError::Notification {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        GroupTypeError::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_store_query() {
        let err = GroupTypeError::store_query("fetch_all", ProjectId(9), "connection reset");
        assert_eq!(
            err.to_string(),
            "Mapping store fetch_all failed for project 9: connection reset"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: GroupTypeError = parse.into();
        assert!(matches!(err, GroupTypeError::Serde { .. }));
    }
}
