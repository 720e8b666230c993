//! Export queue
//!
//! Sessions requested for export wait in a FIFO queue and are handed to the
//! export dialog one at a time. A session's files are written to a
//! temporary artifact before it is queued. Finished artifacts are kept so a
//! session can be exported again without refetching; only the most recent
//! few are retained, the rest are removed along with their directories.

use super::artifact::ExportArtifact;
use super::destination::copy_into;
use super::types::{
    ExportError, ExportEvent, ExportOutcome, ExportRequest, SessionFile, SessionId,
};
use crate::config::CoreConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};

const EVENT_CAPACITY: usize = 64;
const DEFAULT_RETAINED_ARTIFACTS: usize = 8;

/// Provides the recorded files of a session
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn files(&self, session_id: &SessionId) -> Result<Vec<SessionFile>, ExportError>;
}

/// Presents one export to the user and reports how it ended
#[async_trait]
pub trait ExportDialog: Send + Sync {
    async fn present(&self, request: ExportRequest) -> Result<ExportOutcome, ExportError>;
}

/// Dialog without a user: copies every export into a fixed directory
pub struct DirectoryExportDialog {
    destination: PathBuf,
}

impl DirectoryExportDialog {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

#[async_trait]
impl ExportDialog for DirectoryExportDialog {
    async fn present(&self, request: ExportRequest) -> Result<ExportOutcome, ExportError> {
        let destination = self.destination.clone();
        let path = tokio::task::spawn_blocking(move || copy_into(&request.directory, &destination))
            .await
            .map_err(|e| ExportError::TaskPanicked(e.to_string()))??;
        Ok(ExportOutcome::Exported { path })
    }
}

struct PendingExport {
    session_id: SessionId,
    /// Artifact written; false while files are still being fetched
    ready: bool,
}

struct InFlight {
    session_id: SessionId,
    cancel: Option<oneshot::Sender<()>>,
}

struct QueueState {
    pending: VecDeque<PendingExport>,
    in_flight: Option<InFlight>,
    artifacts: HashMap<SessionId, Arc<ExportArtifact>>,
    /// Sessions with a finished export, oldest first
    finished: VecDeque<SessionId>,
    retain_limit: usize,
    shut_down: bool,
}

impl QueueState {
    fn is_requested(&self, session_id: &SessionId) -> bool {
        self.pending.iter().any(|p| &p.session_id == session_id)
            || self
                .in_flight
                .as_ref()
                .is_some_and(|f| &f.session_id == session_id)
    }

    /// Record a finished export and remove the oldest idle artifacts past
    /// the limit. Returns how many were removed.
    fn retain_finished(&mut self, session_id: &SessionId) -> usize {
        self.finished.retain(|id| id != session_id);
        self.finished.push_back(session_id.clone());

        let mut evicted = 0;
        while self.finished.len() > self.retain_limit {
            let Some(index) = self.finished.iter().position(|id| !self.is_requested(id)) else {
                break;
            };
            if let Some(id) = self.finished.remove(index) {
                self.artifacts.remove(&id);
                evicted += 1;
            }
        }
        evicted
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.as_mut().and_then(|f| f.cancel.take()) {
            Some(cancel) => cancel.send(()).is_ok(),
            None => false,
        }
    }
}

struct Shared {
    source: Arc<dyn SessionSource>,
    dialog: Arc<dyn ExportDialog>,
    temp_root: Option<PathBuf>,
    state: Mutex<QueueState>,
    events: broadcast::Sender<ExportEvent>,
}

impl Shared {
    fn emit(&self, event: ExportEvent) {
        let _ = self.events.send(event);
    }
}

/// Single-flight export coordinator
///
/// Must be used inside a Tokio runtime. Dropping the queue shuts it down.
pub struct ExportQueue {
    shared: Arc<Shared>,
}

impl ExportQueue {
    /// Create a queue writing artifacts under `temp_root` (or the system
    /// temp directory)
    pub fn new(
        source: Arc<dyn SessionSource>,
        dialog: Arc<dyn ExportDialog>,
        temp_root: Option<PathBuf>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                source,
                dialog,
                temp_root,
                state: Mutex::new(QueueState {
                    pending: VecDeque::new(),
                    in_flight: None,
                    artifacts: HashMap::new(),
                    finished: VecDeque::new(),
                    retain_limit: DEFAULT_RETAINED_ARTIFACTS,
                    shut_down: false,
                }),
                events,
            }),
        }
    }

    pub fn from_config(
        config: &CoreConfig,
        source: Arc<dyn SessionSource>,
        dialog: Arc<dyn ExportDialog>,
    ) -> Self {
        Self::new(source, dialog, config.export_temp_dir.clone())
            .with_retained_artifacts(config.export_retained_artifacts)
    }

    /// Keep at most `limit` finished artifacts for re-export
    pub fn with_retained_artifacts(self, limit: usize) -> Self {
        self.shared.state.lock().retain_limit = limit;
        self
    }

    /// Queue a session for export.
    ///
    /// Fetches and writes the session's files first unless an artifact
    /// already exists. A session that is already queued or being exported
    /// is left where it is. Sessions are presented in the order they were
    /// requested.
    pub async fn request_export(&self, session_id: impl Into<SessionId>) -> Result<(), ExportError> {
        let session_id = session_id.into();

        let needs_files = {
            let mut state = self.shared.state.lock();
            if state.shut_down {
                return Err(ExportError::ShutDown);
            }
            if state.is_requested(&session_id) {
                tracing::debug!("Export of {} already requested", session_id);
                return Ok(());
            }
            let ready = state.artifacts.contains_key(&session_id);
            state.pending.push_back(PendingExport {
                session_id: session_id.clone(),
                ready,
            });
            !ready
        };

        let queued = if needs_files {
            let mut guard = PreparingGuard {
                shared: &self.shared,
                session_id: &session_id,
                armed: true,
            };
            let prepared = self.prepare(&session_id).await;
            guard.armed = false;

            match prepared {
                Ok(queued) => queued,
                Err(e) => {
                    tracing::error!("Preparing export of {} failed: {}", session_id, e);
                    self.shared
                        .state
                        .lock()
                        .pending
                        .retain(|p| p.session_id != session_id);
                    self.shared.emit(ExportEvent::Failed {
                        session_id: session_id.clone(),
                        message: e.to_string(),
                    });
                    advance(&self.shared);
                    return Err(e);
                }
            }
        } else {
            true
        };

        if queued {
            tracing::info!("Queued export of {}", session_id);
            self.shared.emit(ExportEvent::Queued {
                session_id: session_id.clone(),
            });
        }
        advance(&self.shared);
        Ok(())
    }

    /// Fetch and write the files, then mark the pending entry ready.
    /// Nothing is awaited after the entry is marked.
    /// Returns `false` when the request was discarded meanwhile.
    async fn prepare(&self, session_id: &SessionId) -> Result<bool, ExportError> {
        let files = self.shared.source.files(session_id).await?;

        let temp_root = self.shared.temp_root.clone();
        let id = session_id.clone();
        let artifact = tokio::task::spawn_blocking(move || {
            ExportArtifact::materialize(&id, &files, temp_root.as_deref())
        })
        .await
        .map_err(|e| ExportError::TaskPanicked(e.to_string()))??;

        let mut state = self.shared.state.lock();
        if state.shut_down {
            return Err(ExportError::ShutDown);
        }
        match state.pending.iter_mut().find(|p| &p.session_id == session_id) {
            Some(entry) => entry.ready = true,
            None => {
                tracing::debug!("Export of {} was discarded while preparing", session_id);
                return Ok(false);
            }
        }
        state.artifacts.insert(session_id.clone(), Arc::new(artifact));
        Ok(true)
    }

    /// Cancel the export being presented. The queue moves on to the next
    /// session. Returns `false` when nothing is in flight.
    pub fn cancel_current(&self) -> bool {
        let cancelled = self.shared.state.lock().cancel_in_flight();
        if cancelled {
            tracing::info!("Cancelling current export");
        }
        cancelled
    }

    /// Drop a session's artifact and any pending or in-flight export of it.
    /// Returns `true` if an artifact was removed.
    pub fn discard(&self, session_id: &SessionId) -> bool {
        let mut state = self.shared.state.lock();
        state.pending.retain(|p| &p.session_id != session_id);
        if state
            .in_flight
            .as_ref()
            .is_some_and(|f| &f.session_id == session_id)
        {
            state.cancel_in_flight();
        }
        state.finished.retain(|id| id != session_id);
        let removed = state.artifacts.remove(session_id).is_some();
        if removed {
            tracing::debug!("Discarded export artifact for {}", session_id);
        }
        removed
    }

    /// Stop accepting requests, cancel the current export and remove every
    /// artifact
    pub fn shutdown(&self) {
        let mut state = self.shared.state.lock();
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        state.pending.clear();
        state.cancel_in_flight();
        let count = state.artifacts.len();
        state.artifacts.clear();
        state.finished.clear();
        tracing::info!("Export queue shut down, removed {} artifact(s)", count);
    }

    /// Sessions waiting for the dialog, in order
    pub fn pending(&self) -> Vec<SessionId> {
        self.shared
            .state
            .lock()
            .pending
            .iter()
            .map(|p| p.session_id.clone())
            .collect()
    }

    pub fn in_flight(&self) -> Option<SessionId> {
        self.shared
            .state
            .lock()
            .in_flight
            .as_ref()
            .map(|f| f.session_id.clone())
    }

    pub fn has_artifact(&self, session_id: &SessionId) -> bool {
        self.shared.state.lock().artifacts.contains_key(session_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExportEvent> {
        self.shared.events.subscribe()
    }
}

impl Drop for ExportQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Removes the placeholder of a request whose future was dropped before its
/// files were written, so later requests are not held behind it
struct PreparingGuard<'a> {
    shared: &'a Arc<Shared>,
    session_id: &'a SessionId,
    armed: bool,
}

impl Drop for PreparingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let removed = {
            let mut state = self.shared.state.lock();
            let before = state.pending.len();
            state
                .pending
                .retain(|p| p.ready || &p.session_id != self.session_id);
            state.pending.len() != before
        };
        if !removed {
            return;
        }

        tracing::warn!("Export request for {} dropped while preparing", self.session_id);
        self.shared.emit(ExportEvent::Failed {
            session_id: self.session_id.clone(),
            message: "request dropped while preparing".to_string(),
        });
        // Dropped outside a runtime there is nothing to spawn the next export on
        if tokio::runtime::Handle::try_current().is_ok() {
            advance(self.shared);
        }
    }
}

/// Start the next ready export if nothing is in flight
fn advance(shared: &Arc<Shared>) {
    let (session_id, artifact, cancel_rx) = {
        let mut state = shared.state.lock();
        if state.shut_down || state.in_flight.is_some() {
            return;
        }

        let (next, artifact) = loop {
            match state.pending.front() {
                Some(front) if front.ready => {}
                // Head still preparing; keep request order
                _ => return,
            }
            let Some(next) = state.pending.pop_front() else {
                return;
            };
            match state.artifacts.get(&next.session_id) {
                Some(artifact) => break (next, artifact.clone()),
                None => tracing::warn!("No artifact for queued export {}", next.session_id),
            }
        };

        let (cancel_tx, cancel_rx) = oneshot::channel();
        state.in_flight = Some(InFlight {
            session_id: next.session_id.clone(),
            cancel: Some(cancel_tx),
        });
        (next.session_id, artifact, cancel_rx)
    };

    shared.emit(ExportEvent::Started {
        session_id: session_id.clone(),
    });
    tokio::spawn(run_export(shared.clone(), session_id, artifact, cancel_rx));
}

async fn run_export(
    shared: Arc<Shared>,
    session_id: SessionId,
    artifact: Arc<ExportArtifact>,
    cancel_rx: oneshot::Receiver<()>,
) {
    tracing::info!("Presenting export of {}", session_id);

    let request = ExportRequest {
        session_id: session_id.clone(),
        directory: artifact.directory().to_path_buf(),
        files: artifact.files().to_vec(),
    };
    let dialog = shared.dialog.clone();
    let mut presenting = tokio::spawn(async move { dialog.present(request).await });

    let result = tokio::select! {
        joined = &mut presenting => match joined {
            Ok(result) => result,
            Err(e) => Err(ExportError::TaskPanicked(e.to_string())),
        },
        _ = cancel_rx => {
            presenting.abort();
            Ok(ExportOutcome::Cancelled)
        }
    };
    drop(artifact);

    {
        let mut state = shared.state.lock();
        state.in_flight = None;
        if !state.shut_down && state.artifacts.contains_key(&session_id) {
            let evicted = state.retain_finished(&session_id);
            if evicted > 0 {
                tracing::debug!("Removed {} old export artifact(s)", evicted);
            }
        }
    }

    match result {
        Ok(outcome) => {
            tracing::info!("Export of {} finished: {:?}", session_id, outcome);
            shared.emit(ExportEvent::Finished {
                session_id,
                outcome,
            });
        }
        Err(e) => {
            tracing::error!("Export of {} failed: {}", session_id, e);
            shared.emit(ExportEvent::Failed {
                session_id,
                message: e.to_string(),
            });
        }
    }

    advance(&shared);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::time::timeout;

    #[derive(Default)]
    struct ScriptedSource {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl SessionSource for ScriptedSource {
        async fn files(&self, session_id: &SessionId) -> Result<Vec<SessionFile>, ExportError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match session_id.as_str() {
                "gone" => return Err(ExportError::SessionUnavailable(session_id.to_string())),
                "slow" => tokio::time::sleep(Duration::from_secs(3600)).await,
                _ => {}
            }
            Ok(vec![
                SessionFile::new("Accelerometer", format!("{}\n", session_id)),
                SessionFile::new("Gyroscope", "t,x,y,z\n"),
            ])
        }
    }

    /// Records what was presented and how many dialogs were open at once
    #[derive(Default)]
    struct RecordingDialog {
        active: AtomicUsize,
        max_active: AtomicUsize,
        presented: Mutex<Vec<(SessionId, PathBuf, bool)>>,
    }

    impl RecordingDialog {
        fn order(&self) -> Vec<String> {
            self.presented
                .lock()
                .iter()
                .map(|(id, _, _)| id.to_string())
                .collect()
        }
    }

    #[async_trait]
    impl ExportDialog for RecordingDialog {
        async fn present(&self, request: ExportRequest) -> Result<ExportOutcome, ExportError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            let files_exist = request.files.iter().all(|f| f.exists());
            self.presented.lock().push((
                request.session_id.clone(),
                request.directory.clone(),
                files_exist,
            ));

            match request.session_id.as_str() {
                "stuck" => std::future::pending::<()>().await,
                "boom" => panic!("dialog crashed"),
                _ => tokio::time::sleep(Duration::from_millis(30)).await,
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(ExportOutcome::Exported {
                path: request.directory,
            })
        }
    }

    fn queue(root: &Path) -> (Arc<ScriptedSource>, Arc<RecordingDialog>, ExportQueue) {
        let source = Arc::new(ScriptedSource::default());
        let dialog = Arc::new(RecordingDialog::default());
        let queue = ExportQueue::new(source.clone(), dialog.clone(), Some(root.to_path_buf()));
        (source, dialog, queue)
    }

    /// Collect the next `count` completions (finished or failed)
    async fn completions(
        events: &mut broadcast::Receiver<ExportEvent>,
        count: usize,
    ) -> Vec<ExportEvent> {
        let mut done = Vec::new();
        timeout(Duration::from_secs(5), async {
            while done.len() < count {
                match events.recv().await.unwrap() {
                    event @ (ExportEvent::Finished { .. } | ExportEvent::Failed { .. }) => {
                        done.push(event)
                    }
                    _ => {}
                }
            }
        })
        .await
        .unwrap();
        done
    }

    fn finished_ids(events: &[ExportEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ExportEvent::Finished { session_id, .. } => Some(session_id.to_string()),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_single_flight_in_request_order() {
        let root = tempdir().unwrap();
        let (_source, dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        for id in ["a", "b", "b", "c", "d"] {
            queue.request_export(id).await.unwrap();
        }

        let done = completions(&mut events, 4).await;
        assert_eq!(finished_ids(&done), vec!["a", "b", "c", "d"]);
        assert_eq!(dialog.order(), vec!["a", "b", "c", "d"]);
        assert_eq!(dialog.max_active.load(Ordering::SeqCst), 1);
        assert!(dialog.presented.lock().iter().all(|(_, _, exists)| *exists));
        assert!(queue.in_flight().is_none());
        assert!(queue.pending().is_empty());
    }

    #[tokio::test]
    async fn test_existing_artifact_is_reused() {
        let root = tempdir().unwrap();
        let (source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        queue.request_export("a").await.unwrap();
        completions(&mut events, 1).await;
        assert!(queue.has_artifact(&SessionId::from("a")));

        queue.request_export("a").await.unwrap();
        let done = completions(&mut events, 1).await;
        assert_eq!(finished_ids(&done), vec!["a"]);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_advances_queue() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        queue.request_export("stuck").await.unwrap();
        queue.request_export("next").await.unwrap();
        assert_eq!(queue.in_flight(), Some(SessionId::from("stuck")));
        assert_eq!(queue.pending(), vec![SessionId::from("next")]);

        assert!(queue.cancel_current());
        let done = completions(&mut events, 2).await;
        assert_eq!(
            done[0],
            ExportEvent::Finished {
                session_id: SessionId::from("stuck"),
                outcome: ExportOutcome::Cancelled,
            }
        );
        assert_eq!(finished_ids(&done), vec!["stuck", "next"]);
        assert!(!queue.cancel_current());
    }

    #[tokio::test]
    async fn test_failures_do_not_wedge_queue() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        let err = queue.request_export("gone").await.unwrap_err();
        assert!(matches!(err, ExportError::SessionUnavailable(_)));
        assert!(queue.pending().is_empty());
        assert!(!queue.has_artifact(&SessionId::from("gone")));

        queue.request_export("boom").await.unwrap();
        queue.request_export("after").await.unwrap();

        let done = completions(&mut events, 3).await;
        assert!(matches!(&done[0], ExportEvent::Failed { session_id, .. } if session_id.as_str() == "gone"));
        assert!(matches!(&done[1], ExportEvent::Failed { session_id, .. } if session_id.as_str() == "boom"));
        assert_eq!(finished_ids(&done), vec!["after"]);
    }

    #[tokio::test]
    async fn test_dropped_request_does_not_block_later_ones() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        let abandoned = timeout(Duration::from_millis(50), queue.request_export("slow")).await;
        assert!(abandoned.is_err());
        assert!(queue.pending().is_empty());

        queue.request_export("b").await.unwrap();
        let done = completions(&mut events, 2).await;
        assert!(matches!(&done[0], ExportEvent::Failed { session_id, .. } if session_id.as_str() == "slow"));
        assert_eq!(finished_ids(&done), vec!["b"]);
        assert!(!queue.has_artifact(&SessionId::from("slow")));
    }

    #[tokio::test]
    async fn test_only_recent_artifacts_are_retained() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let queue = queue.with_retained_artifacts(2);
        let mut events = queue.subscribe();

        for id in ["a", "b", "c"] {
            queue.request_export(id).await.unwrap();
        }
        completions(&mut events, 3).await;

        assert!(!queue.has_artifact(&SessionId::from("a")));
        assert!(queue.has_artifact(&SessionId::from("b")));
        assert!(queue.has_artifact(&SessionId::from("c")));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);

        // Exporting "b" again makes "c" the oldest
        queue.request_export("b").await.unwrap();
        queue.request_export("d").await.unwrap();
        completions(&mut events, 2).await;
        assert!(!queue.has_artifact(&SessionId::from("c")));
        assert!(queue.has_artifact(&SessionId::from("b")));
        assert!(queue.has_artifact(&SessionId::from("d")));
    }

    #[tokio::test]
    async fn test_discard_removes_artifact() {
        let root = tempdir().unwrap();
        let (_source, dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        queue.request_export("a").await.unwrap();
        completions(&mut events, 1).await;
        let directory = dialog.presented.lock()[0].1.clone();
        assert!(directory.exists());

        assert!(queue.discard(&SessionId::from("a")));
        assert!(!directory.exists());
        assert!(!queue.discard(&SessionId::from("a")));
    }

    #[tokio::test]
    async fn test_drop_removes_all_artifacts() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        queue.request_export("a").await.unwrap();
        queue.request_export("b").await.unwrap();
        completions(&mut events, 2).await;
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 2);

        drop(queue);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_and_rejects() {
        let root = tempdir().unwrap();
        let (_source, _dialog, queue) = queue(root.path());
        let mut events = queue.subscribe();

        queue.request_export("stuck").await.unwrap();
        queue.request_export("waiting").await.unwrap();
        queue.shutdown();

        let done = completions(&mut events, 1).await;
        assert_eq!(finished_ids(&done), vec!["stuck"]);
        assert!(queue.pending().is_empty());
        assert!(matches!(
            queue.request_export("late").await,
            Err(ExportError::ShutDown)
        ));

        // The in-flight artifact goes once its task lets go of it
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_directory_dialog_copies_with_suffix() {
        let root = tempdir().unwrap();
        let destination = tempdir().unwrap();
        let queue = ExportQueue::new(
            Arc::new(ScriptedSource::default()),
            Arc::new(DirectoryExportDialog::new(destination.path())),
            Some(root.path().to_path_buf()),
        );
        let mut events = queue.subscribe();

        queue.request_export("Run").await.unwrap();
        completions(&mut events, 1).await;
        queue.request_export("Run").await.unwrap();
        let done = completions(&mut events, 1).await;

        assert_eq!(
            done[0],
            ExportEvent::Finished {
                session_id: SessionId::from("Run"),
                outcome: ExportOutcome::Exported {
                    path: destination.path().join("Run 2"),
                },
            }
        );
        let copied = destination.path().join("Run").join("Accelerometer.csv");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "Run\n");
    }
}
