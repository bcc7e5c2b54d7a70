use std::{
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver},
    time::Duration,
};

use anyhow::Context;
use notify_debouncer_mini::{
    new_debouncer,
    notify::{RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer,
};

const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Watches a layout file and reports when it has been written to.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by replacing the file are still picked up.
pub struct ConfigWatcher {
    path: PathBuf,
    receiver: Receiver<()>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", path.display()))?;
        let directory = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?
            .to_path_buf();

        let (send_changed, receive_changed) = channel();
        let watched_path = path.clone();

        let mut debouncer = new_debouncer(DEBOUNCE_TIMEOUT, move |res: DebounceEventResult| {
            match res {
                Ok(events) => {
                    if events.iter().any(|event| event.path == watched_path) {
                        // The receiver is gone once the viewer shuts down.
                        let _ = send_changed.send(());
                    }
                }
                Err(e) => log::warn!("Error watching configuration file: {e}"),
            }
        })
        .context("Failed to create file watcher")?;

        debouncer
            .watcher()
            .watch(&directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", directory.display()))?;

        log::info!("Watching {} for changes", path.display());

        Ok(Self {
            path,
            receiver: receive_changed,
            _debouncer: debouncer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drains pending notifications; true if the file changed since the last call.
    pub fn poll_changed(&self) -> bool {
        self.receiver.try_iter().count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_cannot_be_watched() {
        let path = std::env::temp_dir().join("conveyor-viz-missing-layout.json");
        let error = ConfigWatcher::new(&path).err().map(|e| e.to_string());
        assert!(error.is_some_and(|message| message.contains("Failed to resolve")));
    }
}
