use crate::error::Result;
use crate::storage::utils::walk::FileDescriptor;
use serde::Serialize;
use std::path::PathBuf;

/// An object in the bucket, as seen through the public access domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteObjectDescriptor {
    /// Object key.
    pub name: String,
    /// Public URL the object is fetched from.
    pub url: String,
    /// Size reported by the listing, 0 when unknown.
    pub size: u64,
    /// Bytes attached after a successful fetch.
    #[serde(skip)]
    pub content: Option<Vec<u8>>,
}

impl RemoteObjectDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            size,
            content: None,
        }
    }
}

/// Receipt of a completed put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub local_path: Option<PathBuf>,
    pub key: String,
    pub size: u64,
}

/// Settled result of one file within a batch upload.
#[derive(Debug)]
pub struct UploadOutcome {
    pub file: FileDescriptor,
    pub key: String,
    pub result: Result<PutReceipt>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
