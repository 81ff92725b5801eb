use crate::error::{InvalidUploadArgumentSnafu, Result};
use crate::storage::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_CHUNK_SIZE};
use crate::storage::types::PutReceipt;
use crate::wrap_err;
use opendal::Operator;
use snafu::ensure;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncReadExt, BufReader};

/// Trait for putting local files and in-memory content into storage.
pub trait Uploader {
    /// Stream a local file to `key`.
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `key` - Destination object key
    ///
    /// # Returns
    /// * `Result<PutReceipt>` - Receipt, or the failure already logged
    async fn put_stream(&self, local_path: &Path, key: &str) -> Result<PutReceipt>;

    /// Upload raw bytes to `key`. The key must be non-empty and the buffer
    /// present; an empty buffer stores a zero-byte object.
    async fn put_buffer(&self, key: &str, buffer: Option<Vec<u8>>) -> Result<PutReceipt>;
}

/// Implementation of Uploader for OpenDAL Operator.
pub struct OpenDalUploader {
    operator: Operator,
}

fn content_type_for(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

impl OpenDalUploader {
    /// Create a new uploader with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    fn supports_content_type(&self) -> bool {
        self.operator
            .info()
            .full_capability()
            .write_with_content_type
    }

    /// Copy the file through a chunked writer, returning the bytes sent.
    async fn upload_file_streaming(&self, local_path: &Path, key: &str) -> Result<u64> {
        let file = fs::File::open(local_path).await?;
        let file_size = file.metadata().await?.len();
        let mut reader = BufReader::new(file);
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        let mut total_bytes = 0u64;
        let mut request = self.operator.writer_with(key).chunk(DEFAULT_CHUNK_SIZE);
        if self.supports_content_type() {
            request = request.content_type(&content_type_for(key));
        }
        let mut writer = request.await?;

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            writer.write(buffer[..bytes_read].to_vec()).await?;
            total_bytes += bytes_read as u64;
        }
        writer.close().await?;

        if total_bytes != file_size {
            log::warn!(
                "{} changed while uploading: expected {file_size} bytes, sent {total_bytes}",
                local_path.display()
            );
        }
        Ok(total_bytes)
    }
}

impl Uploader for OpenDalUploader {
    async fn put_stream(&self, local_path: &Path, key: &str) -> Result<PutReceipt> {
        log::debug!("put_stream local_path={} key={key}", local_path.display());
        let size = wrap_err!(
            self.upload_file_streaming(local_path, key).await,
            UploadFailed {
                local_path: local_path.display().to_string(),
                remote_path: key.to_string()
            }
        )
        .inspect_err(|e| log::error!("{e}"))?;

        Ok(PutReceipt {
            local_path: Some(local_path.to_path_buf()),
            key: key.to_string(),
            size,
        })
    }

    async fn put_buffer(&self, key: &str, buffer: Option<Vec<u8>>) -> Result<PutReceipt> {
        ensure!(!key.is_empty(), InvalidUploadArgumentSnafu { argument: "key" });
        let Some(buffer) = buffer else {
            return InvalidUploadArgumentSnafu { argument: "buffer" }.fail();
        };

        let size = buffer.len() as u64;
        let mut request = self.operator.write_with(key, buffer);
        if self.supports_content_type() {
            request = request.content_type(&content_type_for(key));
        }
        wrap_err!(
            request.await,
            PutFailed {
                remote_path: key.to_string()
            }
        )
        .inspect_err(|e| log::error!("{e}"))?;

        Ok(PutReceipt {
            local_path: None,
            key: key.to_string(),
            size,
        })
    }
}
