//! Decoder feed: barcode decoder output arriving as text lines.
//!
//! Decoded text is untrusted; the engine applies the acceptance filter.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::thread::JoinHandle;

use tokio::sync::mpsc;

use crate::station::StationEvent;

/// One successful decoder read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeEvent {
    pub decoded_text: String,
}

impl DecodeEvent {
    pub fn new(decoded_text: impl Into<String>) -> Self {
        Self {
            decoded_text: decoded_text.into(),
        }
    }
}

/// Open the feed on its own thread and forward reads from it.
///
/// Returns immediately: opening a named pipe blocks until a writer attaches.
/// A feed that cannot be opened is reported as `DecoderUnavailable` and the
/// station carries on with manual entry only.
pub fn open_feed(path: impl Into<PathBuf>, tx: mpsc::Sender<StationEvent>) -> JoinHandle<()> {
    let path = path.into();
    std::thread::spawn(move || match File::open(&path) {
        Ok(file) => {
            tracing::info!(path = %path.display(), "decoder feed opened");
            forward(BufReader::new(file), tx);
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "decoder feed unavailable");
            let _ = tx.blocking_send(StationEvent::DecoderUnavailable(err.to_string()));
        }
    })
}

/// Forward each non-blank line as a [`DecodeEvent`], then `DecoderClosed`.
pub fn spawn_reader<R>(reader: R, tx: mpsc::Sender<StationEvent>) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || forward(reader, tx))
}

fn forward<R: BufRead>(reader: R, tx: mpsc::Sender<StationEvent>) {
    for line in reader.lines() {
        match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => {
                if tx.blocking_send(StationEvent::Decoded(DecodeEvent::new(line))).is_err() {
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "decoder feed read failed");
                break;
            }
        }
    }
    let _ = tx.blocking_send(StationEvent::DecoderClosed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn feed_lines_become_decode_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanner.txt");
        std::fs::write(&path, "B1000001\n\n  \nnoise\n").unwrap();
        let (tx, mut rx) = mpsc::channel(8);

        open_feed(&path, tx);

        assert_eq!(rx.recv().await, Some(StationEvent::Decoded(DecodeEvent::new("B1000001"))));
        assert_eq!(rx.recv().await, Some(StationEvent::Decoded(DecodeEvent::new("noise"))));
        assert_eq!(rx.recv().await, Some(StationEvent::DecoderClosed));
    }

    #[tokio::test]
    async fn missing_feed_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, mut rx) = mpsc::channel(1);

        open_feed(dir.path().join("missing"), tx);

        assert!(matches!(rx.recv().await, Some(StationEvent::DecoderUnavailable(_))));
        assert_eq!(rx.recv().await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn named_pipe_without_writer_does_not_block_the_caller() {
        use std::io::Write;
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("scanner.fifo");
        let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
        assert!(status.success());
        let (tx, mut rx) = mpsc::channel(8);

        let feed = fifo.clone();
        let opened = tokio::time::timeout(
            Duration::from_secs(2),
            tokio::task::spawn_blocking(move || {
                open_feed(feed, tx);
            }),
        )
        .await;
        assert!(opened.is_ok(), "open_feed blocked waiting for a writer");
        assert!(rx.try_recv().is_err());

        std::thread::spawn(move || {
            let mut writer = std::fs::OpenOptions::new().write(true).open(&fifo).unwrap();
            writer.write_all(b"B1000001\n").unwrap();
        });

        assert_eq!(rx.recv().await, Some(StationEvent::Decoded(DecodeEvent::new("B1000001"))));
        assert_eq!(rx.recv().await, Some(StationEvent::DecoderClosed));
    }
}
