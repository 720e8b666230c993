//! Export artifacts
//!
//! A session's files written as CSV into a scoped temporary directory. The
//! directory is removed when the artifact is dropped.

use super::types::{ExportError, SessionFile, SessionId};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "sensor-export-";

/// Temporary on-disk copy of a session ready for export
#[derive(Debug)]
pub struct ExportArtifact {
    session_id: SessionId,
    directory: PathBuf,
    files: Vec<PathBuf>,
    // Dropped last; removes everything above
    _root: TempDir,
}

impl ExportArtifact {
    /// Write `files` as `<name>.csv` into a fresh directory under
    /// `temp_root` (or the system temp directory)
    pub fn materialize(
        session_id: &SessionId,
        files: &[SessionFile],
        temp_root: Option<&Path>,
    ) -> Result<Self, ExportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_PREFIX);
        let root = match temp_root {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        let directory = root.path().join(sanitize(session_id.as_str(), "session"));
        fs::create_dir(&directory)?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = directory.join(format!("{}.csv", sanitize(&file.name, "data")));
            if written.contains(&path) {
                tracing::warn!("Duplicate file name {:?} in session {}", file.name, session_id);
                continue;
            }
            fs::write(&path, &file.contents)?;
            written.push(path);
        }

        tracing::debug!(
            "Materialized {} file(s) for session {} in {:?}",
            written.len(),
            session_id,
            directory
        );

        Ok(Self {
            session_id: session_id.clone(),
            directory,
            files: written,
            _root: root,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Directory holding the CSV files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Make `name` usable as a single path component
fn sanitize(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
