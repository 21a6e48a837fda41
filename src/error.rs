// src/error.rs

//! Error types shared across the crate

use thiserror::Error;

/// Errors that can occur during override reconciliation
#[derive(Error, Debug)]
pub enum Error {
    /// Caller passed an unrecognized group kind, stem scope, or action keyword
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An override file is missing; callers may treat this as "start empty"
    #[error("File not found: {0}")]
    NotFound(String),

    /// A persisted row violates its declared column type or table shape
    #[error("Schema error: {0}")]
    Schema(String),

    /// Directory data asserts membership in more than one group of one kind
    #[error("Multiple groups found: {0}")]
    MultipleGroups(String),

    /// Directory lookup failure
    #[error("Directory error: {0}")]
    Directory(String),

    /// Grouper web-service transport or response failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration file failure
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for override reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;
