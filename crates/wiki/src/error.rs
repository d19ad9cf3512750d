// ABOUTME: Error types for the wiki scraper including the ErrorCode enum and WikiError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of scraper failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Fetch,
    Io,
    Json,
    Registry,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Io => "I/O error",
            ErrorCode::Json => "JSON error",
            ErrorCode::Registry => "registry error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for wiki operations.
///
/// `target` is whatever the operation was aimed at: a URL for fetches, a file
/// path for dataset and registry access.
#[derive(Debug, thiserror::Error)]
pub struct WikiError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proguide: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl WikiError {
    fn new(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Fetch error.
    pub fn fetch(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, target, op, source)
    }

    /// Create an Io error.
    pub fn io(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Io, target, op, source)
    }

    /// Create a Json error.
    pub fn json(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Json, target, op, source)
    }

    /// Create a Registry error.
    pub fn registry(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Registry, target, op, source)
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is a Json error.
    pub fn is_json(&self) -> bool {
        self.code == ErrorCode::Json
    }

    /// Returns true if this is a Registry error.
    pub fn is_registry(&self) -> bool {
        self.code == ErrorCode::Registry
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WikiError>;
