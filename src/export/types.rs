//! Export types
//!
//! This module defines the types exchanged between the export queue, the
//! session source and the export dialog, and the export error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Identifies a recorded session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One recorded data file of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFile {
    /// File name without extension
    pub name: String,
    pub contents: Vec<u8>,
}

impl SessionFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// What the export dialog is asked to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub session_id: SessionId,
    /// Temporary directory holding the session's files
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// How a presented export ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ExportOutcome {
    /// Copied to the given location
    Exported { path: PathBuf },
    /// Dismissed by the user or cancelled by the host
    Cancelled,
}

/// Export queue notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ExportEvent {
    /// Files are ready and the session is waiting for the dialog
    Queued { session_id: SessionId },
    /// The dialog is being presented
    Started { session_id: SessionId },
    /// The dialog completed
    Finished {
        session_id: SessionId,
        outcome: ExportOutcome,
    },
    /// Preparing or presenting the export failed
    Failed {
        session_id: SessionId,
        message: String,
    },
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Dialog error: {0}")]
    Dialog(String),

    #[error("Export task panicked: {0}")]
    TaskPanicked(String),

    #[error("Export queue is shut down")]
    ShutDown,
}

impl From<ExportError> for String {
    fn from(e: ExportError) -> String {
        e.to_string()
    }
}
