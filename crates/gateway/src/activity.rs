//! Append-only activity log.
//!
//! Every entry is one line, `[<timestamp>] <message>`, echoed to the console
//! through `tracing` (target `activity`) and appended to a file by a
//! background task. Logging never blocks or fails the caller: entries are sent
//! over an unbounded channel and write errors are reported and dropped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Handle for writing activity entries.
///
/// Cheap to clone; all clones feed the same writer.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    tx: mpsc::UnboundedSender<String>,
}

impl ActivityLog {
    /// Start a writer task appending entries to `path`.
    ///
    /// The task ends once every `ActivityLog` clone has been dropped and the
    /// queued entries are written.
    #[must_use]
    pub fn spawn_file_writer(path: impl Into<PathBuf>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(write_entries(path.into(), rx));
        (Self { tx }, handle)
    }

    /// Create a log whose entries are delivered to the returned receiver.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Record one activity entry.
    pub fn log(&self, message: impl AsRef<str>) {
        let entry = format_entry(Utc::now(), message.as_ref());
        tracing::info!(target: "activity", "{entry}");

        // Writer gone means we are shutting down
        let _ = self.tx.send(entry);
    }
}

/// Render an entry without its trailing newline.
fn format_entry(at: DateTime<Utc>, message: &str) -> String {
    format!(
        "[{}] {message}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

async fn write_entries(path: PathBuf, mut rx: mpsc::UnboundedReceiver<String>) {
    let mut file: Option<File> = None;

    while let Some(entry) = rx.recv().await {
        if file.is_none() {
            match open_append(&path).await {
                Ok(f) => file = Some(f),
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Error writing to log file");
                    continue;
                }
            }
        }

        if let Some(f) = file.as_mut() {
            let line = format!("{entry}\n");
            let written = match f.write_all(line.as_bytes()).await {
                Ok(()) => f.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                tracing::error!(path = %path.display(), error = %e, "Error writing to log file");
                // Reopen on the next entry
                file = None;
            }
        }
    }
}

async fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_format_entry() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            format_entry(at, "Homepage accessed"),
            "[2024-03-09T14:05:07.000Z] Homepage accessed"
        );
    }

    #[tokio::test]
    async fn test_channel_receives_entries_in_order() {
        let (log, mut rx) = ActivityLog::channel();
        log.log("first");
        log.log("second");

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.starts_with('['));
        assert!(first.ends_with("] first"));
        assert!(second.ends_with("] second"));
    }

    #[test]
    fn test_log_after_receiver_dropped_is_silent() {
        let (log, rx) = ActivityLog::channel();
        drop(rx);
        log.log("nobody is listening");
    }

    #[tokio::test]
    async fn test_file_writer_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.log");
        std::fs::write(&path, "existing line\n").unwrap();

        let (log, handle) = ActivityLog::spawn_file_writer(&path);
        log.log("Request: GET /");
        log.log("Homepage accessed");
        drop(log);
        handle.await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing line");
        assert!(lines[1].ends_with("] Request: GET /"));
        assert!(lines[2].ends_with("] Homepage accessed"));
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_file_writer_survives_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let (log, handle) = ActivityLog::spawn_file_writer(dir.path());
        log.log("lost entry");
        drop(log);
        handle.await.unwrap();
    }
}
