use crate::error::{Error, InvalidConfigValueSnafu, MissingConfigSnafu, PathNotFoundSnafu, Result};
use futures::stream::{self, StreamExt};
use opendal::Operator;
use snafu::ensure;
use std::path::Path;
use std::str::FromStr;

pub mod constants;
pub mod http;
mod operations;
pub mod types;
pub mod utils;

use self::constants::{DEFAULT_FS_ROOT, DEFAULT_OSS_ENDPOINT, DEFAULT_UPLOAD_CONCURRENCY};
use self::http::{HttpFetcher, ReqwestFetcher};
use self::operations::delete::OpenDalDeleter;
use self::operations::download::HttpDownloader;
use self::operations::list::OpenDalLister;
use self::operations::upload::OpenDalUploader;
use self::operations::{Deleter, Downloader, Lister, Uploader};
use self::types::{PutReceipt, RemoteObjectDescriptor, UploadOutcome};
use self::utils::path::{join_url, remote_key_for};
use self::utils::walk::{FileDescriptor, walk};

/// Storage provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageProvider {
    Oss,
    S3,
    Fs,
    Hdfs,
}

impl FromStr for StorageProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "oss" => Ok(Self::Oss),
            "s3" | "minio" => Ok(Self::S3),
            "fs" => Ok(Self::Fs),
            "hdfs" => Ok(Self::Hdfs),
            _ => Err(Error::UnsupportedProvider {
                provider: s.to_string(),
            }),
        }
    }
}

/// Unified storage configuration for different providers
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub access_key_secret: Option<String>,
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub root_path: Option<String>,
    pub name_node: Option<String>,
    /// Public (CDN) domain objects are read from.
    pub access_domain: Option<String>,
    /// Key prefix under which every uploaded object is stored.
    pub custom_folder: String,
    pub upload_concurrency: usize,
}

impl StorageConfig {
    fn base(provider: StorageProvider, bucket: String) -> Self {
        Self {
            provider,
            bucket,
            access_key_id: None,
            access_key_secret: None,
            endpoint: None,
            region: None,
            root_path: None,
            name_node: None,
            access_domain: None,
            custom_folder: String::new(),
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY,
        }
    }

    pub fn oss(
        bucket: String,
        access_key_id: String,
        access_key_secret: String,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id),
            access_key_secret: Some(access_key_secret),
            region,
            ..Self::base(StorageProvider::Oss, bucket)
        }
    }

    pub fn s3(
        bucket: String,
        access_key_id: String,
        secret_access_key: String,
        region: Option<String>,
    ) -> Self {
        Self {
            access_key_id: Some(access_key_id),
            access_key_secret: Some(secret_access_key),
            region,
            ..Self::base(StorageProvider::S3, bucket)
        }
    }

    pub fn fs(root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            ..Self::base(StorageProvider::Fs, "local".to_string())
        }
    }

    pub fn hdfs(name_node: String, root_path: String) -> Self {
        Self {
            root_path: Some(root_path),
            name_node: Some(name_node),
            // Bucket is not really used for HDFS
            ..Self::base(StorageProvider::Hdfs, "hdfs".to_string())
        }
    }

    pub fn with_access_domain(mut self, domain: impl Into<String>) -> Self {
        self.access_domain = Some(domain.into());
        self
    }

    pub fn with_custom_folder(mut self, folder: impl Into<String>) -> Self {
        self.custom_folder = folder.into();
        self
    }

    /// Reject configurations that cannot reach the store.
    pub fn validate(&self) -> Result<()> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        match self.provider {
            StorageProvider::Oss | StorageProvider::S3 => {
                ensure!(
                    !self.bucket.trim().is_empty(),
                    MissingConfigSnafu { field: "bucket" }
                );
                ensure!(
                    present(&self.access_key_id),
                    MissingConfigSnafu {
                        field: "access_key_id"
                    }
                );
                ensure!(
                    present(&self.access_key_secret),
                    MissingConfigSnafu {
                        field: "access_key_secret"
                    }
                );
            }
            StorageProvider::Hdfs => {
                ensure!(
                    present(&self.name_node),
                    MissingConfigSnafu { field: "name_node" }
                );
            }
            StorageProvider::Fs => {}
        }
        ensure!(
            self.upload_concurrency > 0,
            InvalidConfigValueSnafu {
                key: "upload_concurrency",
                value: "0"
            }
        );
        Ok(())
    }

    /// Domain public URLs are composed under.
    ///
    /// Falls back to the bucket's own address when no access domain is set:
    /// virtual-host style for OSS and AWS, path style for custom S3 endpoints,
    /// and a `file://` URL for local roots. A `file://` domain is only good
    /// for composing URLs; see [`StorageConfig::serves_http`].
    pub fn public_domain(&self) -> String {
        if let Some(domain) = &self.access_domain {
            return domain.trim_end_matches('/').to_string();
        }
        match self.provider {
            StorageProvider::Oss => {
                let endpoint = self.endpoint.as_deref().unwrap_or(DEFAULT_OSS_ENDPOINT);
                let (scheme, host) = endpoint.split_once("://").unwrap_or(("https", endpoint));
                format!("{scheme}://{}.{}", self.bucket, host.trim_end_matches('/'))
            }
            StorageProvider::S3 => match &self.endpoint {
                Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
                None => format!(
                    "https://{}.s3.{}.amazonaws.com",
                    self.bucket,
                    self.region.as_deref().unwrap_or("us-east-1")
                ),
            },
            StorageProvider::Fs | StorageProvider::Hdfs => {
                let root = self.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT);
                format!("file://{}", root.trim_end_matches('/'))
            }
        }
    }

    /// Whether public URLs resolve over HTTP, so downloads can work.
    ///
    /// Local and HDFS roots only do when an access domain fronts them.
    pub fn serves_http(&self) -> bool {
        match self.provider {
            StorageProvider::Oss | StorageProvider::S3 => true,
            StorageProvider::Fs | StorageProvider::Hdfs => self.access_domain.is_some(),
        }
    }
}

/// Batch upload, listing and download façade over one OpenDAL operator.
///
/// Construction validates the configuration; every steady-state failure is
/// logged where it happens and handed back as a value.
#[derive(Clone)]
pub struct TransferManager<F = ReqwestFetcher> {
    operator: Operator,
    config: StorageConfig,
    fetcher: F,
}

impl TransferManager<ReqwestFetcher> {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;
        let operator = Self::build_operator(&config)?;
        Ok(Self {
            operator,
            config,
            fetcher: ReqwestFetcher::default(),
        })
    }

    fn build_operator(config: &StorageConfig) -> Result<Operator> {
        match &config.provider {
            StorageProvider::Oss => {
                let mut builder = opendal::services::Oss::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(access_key_secret) = &config.access_key_secret {
                    builder = builder.access_key_secret(access_key_secret);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::S3 => {
                let mut builder = opendal::services::S3::default().bucket(&config.bucket);
                if let Some(access_key_id) = &config.access_key_id {
                    builder = builder.access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = &config.access_key_secret {
                    builder = builder.secret_access_key(secret_access_key);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Fs => {
                let root = config.root_path.as_deref().unwrap_or(DEFAULT_FS_ROOT);
                let builder = opendal::services::Fs::default().root(root);
                Ok(Operator::new(builder)?.finish())
            }
            StorageProvider::Hdfs => {
                #[cfg(feature = "hdfs")]
                {
                    let root = config.root_path.as_deref().unwrap_or("/");
                    let name_node = config.name_node.as_deref().unwrap_or_default();
                    let builder = opendal::services::Hdfs::default()
                        .root(root)
                        .name_node(name_node);
                    Ok(Operator::new(builder)?.finish())
                }

                #[cfg(not(feature = "hdfs"))]
                {
                    Err(Error::UnsupportedProvider {
                        provider: "hdfs (feature disabled)".to_string(),
                    })
                }
            }
        }
    }
}

impl<F: HttpFetcher> TransferManager<F> {
    /// Replace the HTTP collaborator used by downloads.
    pub fn with_fetcher<G: HttpFetcher>(self, fetcher: G) -> TransferManager<G> {
        TransferManager {
            operator: self.operator,
            config: self.config,
            fetcher,
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Upload every file, keyed under the custom folder.
    ///
    /// Uploads run concurrently and all of them settle before this returns;
    /// one failure never cancels the others. Outcomes follow input order.
    pub async fn batch_upload(
        &self,
        files: &[FileDescriptor],
        prefix_to_strip: &str,
    ) -> Vec<UploadOutcome> {
        log::debug!(
            "batch_upload provider={:?} files={} prefix_to_strip={prefix_to_strip}",
            self.config.provider,
            files.len()
        );
        let uploader = OpenDalUploader::new(self.operator.clone());
        let uploader = &uploader;

        stream::iter(files.iter().cloned().map(|file| {
            let key = remote_key_for(
                &file.path,
                &file.filename,
                prefix_to_strip,
                &self.config.custom_folder,
            );
            log::info!("save file to {key}");
            async move {
                let result = uploader.put_stream(&file.path, &key).await;
                UploadOutcome {
                    file,
                    key,
                    result,
                }
            }
        }))
        .buffered(self.config.upload_concurrency.max(1))
        .collect::<Vec<_>>()
        .await
    }

    /// Walk `root` and upload everything below it.
    ///
    /// Keys are relative to `prefix_to_strip`, or to `root` itself when none is
    /// given (the parent directory when `root` is a file).
    pub async fn upload_dir(
        &self,
        root: impl AsRef<Path>,
        prefix_to_strip: Option<&str>,
    ) -> Result<Vec<UploadOutcome>> {
        let root = root.as_ref();
        ensure!(
            root.exists(),
            PathNotFoundSnafu {
                path: root.to_path_buf()
            }
        );
        let files = walk(root)?;
        let prefix = match prefix_to_strip {
            Some(prefix) => prefix.to_string(),
            None if root.is_file() => root
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            None => root.to_string_lossy().to_string(),
        };
        Ok(self.batch_upload(&files, &prefix).await)
    }

    pub async fn put_stream(&self, local_path: impl AsRef<Path>, key: &str) -> Result<PutReceipt> {
        let uploader = OpenDalUploader::new(self.operator.clone());
        uploader.put_stream(local_path.as_ref(), key).await
    }

    /// Upload `buffer` to `key`; `None` is rejected before any I/O.
    pub async fn put_buffer(&self, key: &str, buffer: Option<Vec<u8>>) -> Result<PutReceipt> {
        let uploader = OpenDalUploader::new(self.operator.clone());
        uploader.put_buffer(key, buffer).await
    }

    pub async fn put_string(&self, key: &str, text: &str) -> Result<PutReceipt> {
        self.put_buffer(key, Some(text.as_bytes().to_vec())).await
    }

    pub async fn delete_object(&self, key: &str) -> Result<()> {
        let deleter = OpenDalDeleter::new(self.operator.clone());
        deleter.delete(key).await
    }

    /// Recursively list every object below `prefix`.
    pub async fn list_directory(&self, prefix: &str) -> Result<Vec<RemoteObjectDescriptor>> {
        log::debug!(
            "list_directory provider={:?} prefix={prefix}",
            self.config.provider
        );
        let lister = OpenDalLister::new(self.operator.clone(), self.config.public_domain());
        lister.list(prefix).await
    }

    pub async fn download_to(
        &self,
        object: &RemoteObjectDescriptor,
        local_path: impl AsRef<Path>,
    ) -> bool {
        let downloader = HttpDownloader::new(&self.fetcher);
        downloader.download_to(object, local_path.as_ref()).await
    }

    pub async fn download_content(
        &self,
        object: RemoteObjectDescriptor,
    ) -> Option<RemoteObjectDescriptor> {
        let downloader = HttpDownloader::new(&self.fetcher);
        downloader.download_content(object).await
    }

    /// Descriptor for `key`, addressed through the public domain.
    pub fn object_for_key(&self, key: &str) -> RemoteObjectDescriptor {
        RemoteObjectDescriptor::new(key, join_url(&self.config.public_domain(), key), 0)
    }

    /// `{access_domain}/{custom_folder}{relative_path}`
    pub fn remote_key_to_public_url(&self, relative_path: &str) -> String {
        format!("{}{relative_path}", self.base_url())
    }

    /// `{access_domain}/{custom_folder}`
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.public_domain(),
            self.config.custom_folder
        )
    }
}
