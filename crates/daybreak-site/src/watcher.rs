//! File watching for rebuilds.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use crate::patterns::PatternSet;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A stylesheet input changed
    StylesheetModified(PathBuf),

    /// A watch target was created
    Created(PathBuf),

    /// A watch target was deleted
    Deleted(PathBuf),

    /// A watch target was modified
    Modified(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::StylesheetModified(path)
            | WatchEvent::Created(path)
            | WatchEvent::Deleted(path)
            | WatchEvent::Modified(path) => path,
        }
    }
}

/// Errors that can occur when starting the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to start file watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error("Watch directory not found: {0}")]
    MissingDirectory(String),
}

/// Which paths are worth a rebuild, relative to the project root.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    targets: PatternSet,
    stylesheets: Vec<PathBuf>,
}

impl WatchFilter {
    pub fn new(root: &Path, targets: PatternSet, stylesheets: Vec<PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            targets,
            stylesheets,
        }
    }

    /// Classify a notify event for `path`, or `None` when it is irrelevant.
    pub fn classify(&self, path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
        use notify::EventKind;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let is_stylesheet = self
            .stylesheets
            .iter()
            .any(|s| s.strip_prefix(&self.root).unwrap_or(s.as_path()) == relative);

        if !is_stylesheet && !self.targets.matches_under(&self.root, path) {
            return None;
        }

        match kind {
            EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
            EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
            EventKind::Modify(_) if is_stylesheet => {
                Some(WatchEvent::StylesheetModified(path.to_path_buf()))
            }
            EventKind::Modify(_) => Some(WatchEvent::Modified(path.to_path_buf())),
            _ => None,
        }
    }
}

/// Events collected during a burst, one per path, in arrival order.
#[derive(Debug, Default)]
struct PendingEvents {
    events: Vec<WatchEvent>,
}

impl PendingEvents {
    /// Queue `event`, replacing an earlier event for the same path.
    fn push(&mut self, event: WatchEvent) {
        match self.events.iter_mut().find(|e| e.path() == event.path()) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn drain(&mut self) -> Vec<WatchEvent> {
        std::mem::take(&mut self.events)
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `dir` recursively, forwarding events that pass `filter`.
    ///
    /// Returns the watcher and a channel to receive events. Changes are held
    /// until 100ms pass without another one, then sent once per path.
    pub fn new(
        dir: &Path,
        filter: WatchFilter,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), WatchError> {
        let dir = dir
            .canonicalize()
            .map_err(|_| WatchError::MissingDirectory(dir.display().to_string()))?;

        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })?;
        watcher.watch(&dir, RecursiveMode::Recursive)?;

        // Events carry canonical paths; the filter has to compare against the same form.
        let filter = match filter.root.canonicalize() {
            Ok(root) => WatchFilter {
                stylesheets: filter
                    .stylesheets
                    .iter()
                    .map(|s| s.canonicalize().unwrap_or_else(|_| s.clone()))
                    .collect(),
                root,
                targets: filter.targets,
            },
            Err(_) => filter,
        };

        std::thread::spawn(move || {
            let debounce_duration = Duration::from_millis(100);
            let mut pending = PendingEvents::default();

            loop {
                let received = if pending.is_empty() {
                    sync_rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                } else {
                    sync_rx.recv_timeout(debounce_duration)
                };

                match received {
                    Ok(event) => {
                        for path in &event.paths {
                            if let Some(watch_event) = filter.classify(path, &event.kind) {
                                pending.push(watch_event);
                            }
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        for watch_event in pending.drain() {
                            if async_tx.blocking_send(watch_event).is_err() {
                                return;
                            }
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        for watch_event in pending.drain() {
                            let _ = async_tx.blocking_send(watch_event);
                        }
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}
