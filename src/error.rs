//! Error types for the linkspy library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`LinkSpyError`] — **Fatal**: the scan cannot start or its result cannot
//!   be delivered (bad configuration, report file not writable). Returned as
//!   `Err(LinkSpyError)` from the top-level functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document could not be opened
//!   or decoded. Stored inside [`crate::output::DocumentOutcome`] so one bad
//!   file never costs the rest of the vault.
//!
//! The `Display` text of [`DocumentError`] is exactly the line the CLI prints
//! for that document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the linkspy library.
#[derive(Debug, Error)]
pub enum LinkSpyError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not create or write the report file.
    #[error("Failed to write report file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialised to JSON.
    #[error("Failed to serialise report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A non-fatal error for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentError {
    /// The document vanished or could not be opened; no line was read.
    #[error("File '{}' cannot be read.", .path.display())]
    CannotOpen { path: PathBuf, detail: String },

    /// Reading or decoding failed part-way through the document.
    #[error("An error occurred while processing file '{}': {detail}", .path.display())]
    ReadFailed {
        path: PathBuf,
        /// 1-indexed line on which reading stopped.
        line: usize,
        detail: String,
    },
}

impl DocumentError {
    /// Path of the document this error belongs to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            DocumentError::CannotOpen { path, .. } | DocumentError::ReadFailed { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cannot_open_display() {
        let e = DocumentError::CannotOpen {
            path: PathBuf::from("/vault/notes/a.md"),
            detail: "No such file or directory".into(),
        };
        assert_eq!(e.to_string(), "File '/vault/notes/a.md' cannot be read.");
    }

    #[test]
    fn read_failed_display() {
        let e = DocumentError::ReadFailed {
            path: PathBuf::from("/vault/bad.md"),
            line: 3,
            detail: "stream did not contain valid UTF-8".into(),
        };
        assert_eq!(
            e.to_string(),
            "An error occurred while processing file '/vault/bad.md': stream did not contain valid UTF-8"
        );
        assert_eq!(e.path(), std::path::Path::new("/vault/bad.md"));
    }

    #[test]
    fn invalid_config_display() {
        let e = LinkSpyError::InvalidConfig("markdown extension must not be empty".into());
        assert!(e.to_string().contains("must not be empty"), "got: {e}");
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = LinkSpyError::OutputWriteFailed {
            path: PathBuf::from("/ro/report.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(e.to_string().contains("/ro/report.txt"));
        assert!(e.source().is_some());
    }
}
