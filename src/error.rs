//! Error types for routegrid
//!
//! Provides a unified error type for all operations, plus a coarse
//! classification so callers can tell a bad request from a broken store.

use thiserror::Error;

/// Result type alias using RouteError
pub type Result<T> = std::result::Result<T, RouteError>;

/// Unified error type for routegrid operations
#[derive(Debug, Error)]
pub enum RouteError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(#[from] redb::Error),

    #[error("Existing transaction's writable state is not compatible")]
    IncompatibleTransaction,

    #[error("Record not found")]
    NotFound,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("<{param}>: {message}")]
    InvalidArgument { param: String, message: String },

    #[error("<{param}>: {message}")]
    OutOfRange { param: String, message: String },

    // -------------------------------------------------------------------------
    // Domain Conflicts
    // -------------------------------------------------------------------------
    #[error("There is no map configured for channel {channel_id}")]
    NotConfigured { channel_id: String },

    #[error("User {user_id} is already linked to path {path} in section {section}")]
    AlreadyLinked {
        user_id: String,
        section: u32,
        path: char,
    },

    #[error("User {user_id} is not currently linked to any matching routes in channel {channel_id}")]
    NothingToUnlink { user_id: String, channel_id: String },
}

/// Coarse error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-supplied values violate a documented constraint
    Usage,

    /// Well-formed request that contradicts the current state
    Conflict,

    /// Storage, serialization or programming fault
    System,
}

impl RouteError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::InvalidArgument { .. } | RouteError::OutOfRange { .. } => ErrorKind::Usage,
            RouteError::NotFound
            | RouteError::NotConfigured { .. }
            | RouteError::AlreadyLinked { .. }
            | RouteError::NothingToUnlink { .. } => ErrorKind::Conflict,
            RouteError::Io(_)
            | RouteError::Storage(_)
            | RouteError::IncompatibleTransaction
            | RouteError::Serialization(_)
            | RouteError::Config(_) => ErrorKind::System,
        }
    }

    pub(crate) fn invalid(param: impl Into<String>, message: impl Into<String>) -> Self {
        RouteError::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }

    pub(crate) fn out_of_range(param: impl Into<String>, message: impl Into<String>) -> Self {
        RouteError::OutOfRange {
            param: param.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Conversions from the store and codec
// =============================================================================

impl From<bincode::Error> for RouteError {
    fn from(e: bincode::Error) -> Self {
        RouteError::Serialization(e.to_string())
    }
}

impl From<redb::DatabaseError> for RouteError {
    fn from(e: redb::DatabaseError) -> Self {
        RouteError::Storage(e.into())
    }
}

impl From<redb::TransactionError> for RouteError {
    fn from(e: redb::TransactionError) -> Self {
        RouteError::Storage(e.into())
    }
}

impl From<redb::TableError> for RouteError {
    fn from(e: redb::TableError) -> Self {
        RouteError::Storage(e.into())
    }
}

impl From<redb::StorageError> for RouteError {
    fn from(e: redb::StorageError) -> Self {
        RouteError::Storage(e.into())
    }
}

impl From<redb::CommitError> for RouteError {
    fn from(e: redb::CommitError) -> Self {
        RouteError::Storage(e.into())
    }
}
