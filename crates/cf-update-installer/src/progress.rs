//! Progress sinks for artifact downloads
//!
//! The downloader reports after every chunk it writes. Sinks are called
//! synchronously on the downloading task, so they must be cheap.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};

use crate::download::DownloadProgress;

/// Receiver of download progress updates
pub trait ProgressSink: Send + Sync {
    /// Called after every chunk written to disk
    fn update(&self, progress: &DownloadProgress);

    /// Called once when the transfer completed
    fn finish(&self, _progress: &DownloadProgress) {}
}

/// Discards all progress updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _progress: &DownloadProgress) {}
}

/// Terminal progress bar
///
/// Shows a bar when the server reported a content length and a byte-counting
/// spinner otherwise.
pub struct BarProgress {
    bar: ProgressBar,
    styled: OnceLock<()>,
}

impl BarProgress {
    /// Create a progress bar with the given message
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_message(message.into());
        Self {
            bar,
            styled: OnceLock::new(),
        }
    }

    /// Wrap an existing progress bar (e.g. one attached to a `MultiProgress`)
    pub fn from_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            styled: OnceLock::new(),
        }
    }

    fn apply_style(&self, total: Option<u64>) {
        self.styled.get_or_init(|| match total {
            Some(total) => {
                self.bar.set_length(total);
                self.bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                        .expect("Invalid progress bar template")
                        .progress_chars("#>-"),
                );
            }
            None => {
                self.bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
                        .expect("Invalid progress spinner template"),
                );
            }
        });
    }
}

impl ProgressSink for BarProgress {
    fn update(&self, progress: &DownloadProgress) {
        self.apply_style(progress.total_bytes);
        self.bar.set_position(progress.downloaded_bytes);
    }

    fn finish(&self, progress: &DownloadProgress) {
        self.apply_style(progress.total_bytes);
        self.bar.set_position(progress.downloaded_bytes);
        self.bar.finish_and_clear();
    }
}
