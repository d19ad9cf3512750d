// ABOUTME: Error types for fragment and outline generation.
// ABOUTME: Provides RenderError with Io and UnknownRegion variants.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing LaTeX output.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A fragment or directory could not be written or listed.
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The outline was requested for a region the registry does not list.
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

impl RenderError {
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        RenderError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
