//! Artifact download with progress reporting
//!
//! The archive is streamed chunk by chunk into a file inside the caller's
//! workspace. A non-200 answer means the requested release does not exist,
//! so nothing is retried. The file is flushed, synced and closed before
//! returning because the extractor reopens it by path.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use cf_update_core::types::NetworkConfig;
use futures_util::StreamExt;
use reqwest::StatusCode;
use tracing::{debug, info};

use crate::error::{DownloadFailure, Error, Result};
use crate::progress::ProgressSink;

/// Download progress information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Bytes downloaded so far
    pub downloaded_bytes: u64,

    /// Total bytes, when the server sent a content length
    pub total_bytes: Option<u64>,
}

impl DownloadProgress {
    /// Create a new progress tracker
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            downloaded_bytes: 0,
            total_bytes,
        }
    }

    /// Update progress with new downloaded bytes
    pub fn update(&mut self, downloaded_bytes: u64) {
        self.downloaded_bytes = downloaded_bytes;
    }

    /// Check if download is complete
    pub fn is_complete(&self) -> bool {
        self.total_bytes
            .is_some_and(|total| self.downloaded_bytes >= total)
    }
}

/// HTTP downloader for release artifacts
#[derive(Debug, Clone)]
pub struct ArtifactDownloader {
    client: reqwest::Client,
}

impl ArtifactDownloader {
    /// Create a downloader using the network settings
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&network.user_agent);
        if let Some(secs) = network.download_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| Error::download_failed(&network.release_url, e))?;

        Ok(Self { client })
    }

    /// Download `url` into `destination`, reporting to `sink` after every chunk
    pub async fn download(
        &self,
        url: &str,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<DownloadProgress> {
        info!("Start downloading from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download_failed(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(Error::download_failed(
                url,
                DownloadFailure::BadStatus(response.status().as_u16()),
            ));
        }

        let mut progress = DownloadProgress::new(response.content_length());
        let mut file = File::create(destination).map_err(|e| Error::download_failed(url, e))?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::download_failed(url, e))?;
            file.write_all(&chunk)
                .map_err(|e| Error::download_failed(url, e))?;

            progress.update(progress.downloaded_bytes + chunk.len() as u64);
            sink.update(&progress);
        }

        file.flush().map_err(|e| Error::download_failed(url, e))?;
        file.sync_all()
            .map_err(|e| Error::download_failed(url, e))?;
        drop(file);

        sink.finish(&progress);
        debug!(
            "Downloaded {} bytes to {}",
            progress.downloaded_bytes,
            destination.display()
        );

        Ok(progress)
    }
}
