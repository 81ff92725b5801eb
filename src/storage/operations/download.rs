use crate::storage::http::{HttpFetcher, HttpResponse};
use crate::storage::types::RemoteObjectDescriptor;
use crate::storage::utils::path::ensure_directories;
use std::path::Path;
use tokio::fs;

/// Trait for fetching objects through their public URL.
///
/// Fetch failures are logged and surfaced as `false` / `None`, never as errors.
pub trait Downloader {
    /// Fetch `object` and write its bytes to `local_path`.
    ///
    /// The parent directory of `local_path` is created before the write.
    /// Returns whether the file was written.
    async fn download_to(&self, object: &RemoteObjectDescriptor, local_path: &Path) -> bool;

    /// Fetch `object` and attach its bytes as `content`.
    async fn download_content(
        &self,
        object: RemoteObjectDescriptor,
    ) -> Option<RemoteObjectDescriptor>;
}

/// Implementation of Downloader over any HttpFetcher.
pub struct HttpDownloader<'a, F> {
    fetcher: &'a F,
}

impl<'a, F: HttpFetcher> HttpDownloader<'a, F> {
    /// Create a new downloader borrowing the given fetcher.
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    async fn fetch(&self, object: &RemoteObjectDescriptor) -> Option<HttpResponse> {
        match self.fetcher.get(&object.url).await {
            Ok(response) if response.is_success() => Some(response),
            Ok(response) => {
                log::warn!(
                    "fetch {} returned status {}",
                    object.url,
                    response.status
                );
                None
            }
            Err(e) => {
                log::error!("fetch {} failed: {e}", object.url);
                None
            }
        }
    }
}

impl<F: HttpFetcher> Downloader for HttpDownloader<'_, F> {
    async fn download_to(&self, object: &RemoteObjectDescriptor, local_path: &Path) -> bool {
        log::info!("file {} save to {}", object.name, local_path.display());
        let Some(response) = self.fetch(object).await else {
            return false;
        };

        // The target itself is always a file, whatever its name looks like.
        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = ensure_directories(parent) {
                log::error!("cannot prepare {}: {e}", parent.display());
                return false;
            }
        }
        match fs::write(local_path, &response.data).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("cannot write {}: {e}", local_path.display());
                false
            }
        }
    }

    async fn download_content(
        &self,
        mut object: RemoteObjectDescriptor,
    ) -> Option<RemoteObjectDescriptor> {
        let response = self.fetch(&object).await?;
        object.content = Some(response.data);
        Some(object)
    }
}
