//! Session export module
//!
//! This module writes recorded sessions to temporary CSV artifacts and
//! hands them, one at a time, to an export dialog that copies them to
//! their final location.

pub mod artifact;
pub mod destination;
pub mod queue;
pub mod types;

pub use artifact::ExportArtifact;
pub use destination::{copy_dir, copy_into, unique_destination};
pub use queue::{DirectoryExportDialog, ExportDialog, ExportQueue, SessionSource};
pub use types::{
    ExportError, ExportEvent, ExportOutcome, ExportRequest, SessionFile, SessionId,
};
