//! Archive source client.
//!
//! Fetches release archives from the source host, streaming the body to a
//! `.part` file that is atomically renamed into place once the transfer
//! finishes. One GET per archive; a failure is fatal to the run.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{FileOperation, InstallError, Result};

pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| InstallError::Network {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Deterministic archive URL for an account/repository/tag triple.
    pub fn archive_url(&self, account: &str, repository: &str, tag: &str) -> Result<String> {
        let raw = format!(
            "{}/{}/{}/archive/{}.zip",
            self.base_url, account, repository, tag
        );
        let parsed = url::Url::parse(&raw).map_err(|e| InstallError::InvalidUrl {
            url: raw.clone(),
            source: e,
        })?;
        Ok(parsed.to_string())
    }

    /// Download the archive for `tag` to `dest`, reporting
    /// `(bytes downloaded, total bytes if known)` per received chunk.
    ///
    /// Returns the number of bytes written.
    pub async fn download(
        &self,
        account: &str,
        repository: &str,
        tag: &str,
        dest: &Path,
        mut on_progress: impl FnMut(u64, Option<u64>),
    ) -> Result<u64> {
        let url = self.archive_url(account, repository, tag)?;
        debug!(%url, dest = %dest.display(), "downloading archive");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| fs_error(parent, FileOperation::CreateDir, e))?;
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| InstallError::Network {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::HttpStatus { url, status });
        }

        let total = response.content_length();
        let part = part_path(dest);
        let mut file = fs::File::create(&part)
            .await
            .map_err(|e| fs_error(&part, FileOperation::Create, e))?;

        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| InstallError::Network {
                url: url.clone(),
                source: e,
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| fs_error(&part, FileOperation::Write, e))?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, total);
        }

        file.flush()
            .await
            .map_err(|e| fs_error(&part, FileOperation::Write, e))?;
        file.sync_all()
            .await
            .map_err(|e| fs_error(&part, FileOperation::Write, e))?;
        drop(file);

        fs::rename(&part, dest)
            .await
            .map_err(|e| fs_error(&part, FileOperation::Move, e))?;

        debug!(bytes = downloaded, "archive download complete");
        Ok(downloaded)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    dest.with_extension("part")
}

fn fs_error(path: &Path, operation: FileOperation, source: std::io::Error) -> InstallError {
    InstallError::FileSystem {
        path: path.to_path_buf(),
        operation,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ArchiveClient {
        ArchiveClient::new(&FetchConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn archive_url_follows_host_template() {
        let client = client("https://github.com");
        assert_eq!(
            client
                .archive_url("mobileworks", "mobile-sdk", "v3.5")
                .unwrap(),
            "https://github.com/mobileworks/mobile-sdk/archive/v3.5.zip"
        );
    }

    #[test]
    fn archive_url_tolerates_trailing_slash_in_base() {
        let client = client("http://127.0.0.1:9000/");
        assert_eq!(
            client
                .archive_url("mobileworks", "mobile-crm", "v2.0.1-gold")
                .unwrap(),
            "http://127.0.0.1:9000/mobileworks/mobile-crm/archive/v2.0.1-gold.zip"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let client = client("not-a-host");
        let err = client
            .archive_url("mobileworks", "mobile-sdk", "v3.5")
            .unwrap_err();
        assert!(matches!(err, InstallError::InvalidUrl { .. }));
    }

    #[test]
    fn part_path_replaces_archive_extension() {
        assert_eq!(
            part_path(Path::new("/tmp/mobile-sdk-3.5.zip")),
            Path::new("/tmp/mobile-sdk-3.5.part")
        );
    }
}
