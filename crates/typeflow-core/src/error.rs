//! Unified Error Model
use crate::datum::Datum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Pipeline misconfiguration: dispatch inconsistent with registration.
    RegistryError,
    NetworkError,
    FileError,
    ReadError,
    ParseError,
}

impl ErrorKind {
    /// Registry errors point at a broken pipeline, not at the data;
    /// re-running the same input cannot succeed.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::RegistryError)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegistryError => "REGISTRY",
            Self::NetworkError => "NETWORK",
            Self::FileError => "FILE",
            Self::ReadError => "READ",
            Self::ParseError => "PARSE",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by an operation.
///
/// `operation` is left empty by the operation itself and filled in by the
/// engine with the registered name of the step that failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}/{operation}: {description}")]
pub struct OperationError {
    pub kind: ErrorKind,
    pub description: String,
    pub operation: String,
}

impl OperationError {
    pub fn new(kind: ErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            operation: String::new(),
        }
    }

    pub fn registry(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::RegistryError, description)
    }

    pub fn network(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, description)
    }

    pub fn file(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileError, description)
    }

    pub fn read(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReadError, description)
    }

    pub fn parse(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, description)
    }

    /// Stamps the failing operation's name. Overwrites any prior value.
    pub fn attributed_to(mut self, operation: &str) -> Self {
        self.operation = operation.to_string();
        self
    }

    /// Pairs the error with the input the operation was given, so the engine
    /// can report it as the last successful result.
    pub fn reject(self, input: Datum) -> Rejection {
        Rejection { error: self, input }
    }
}

/// A failed `Operation::execute`: the error plus the untouched input datum.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Rejection {
    pub error: OperationError,
    pub input: Datum,
}
