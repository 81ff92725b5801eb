use crate::error::Result;
use crate::storage::constants::KEY_DELIMITER;
use crate::storage::types::RemoteObjectDescriptor;
use crate::storage::utils::path::{ensure_trailing_slash, join_url};
use crate::wrap_err;
use opendal::Operator;
use std::collections::VecDeque;

/// Trait for listing objects in object storage.
pub trait Lister {
    /// List every object below `prefix`, descending into all sub-prefixes.
    ///
    /// # Arguments
    /// * `prefix` - Folder prefix to expand; empty lists the whole bucket
    ///
    /// # Returns
    /// * `Result<Vec<RemoteObjectDescriptor>>` - Objects across all levels
    async fn list(&self, prefix: &str) -> Result<Vec<RemoteObjectDescriptor>>;
}

/// Implementation of Lister for OpenDAL Operator.
pub struct OpenDalLister {
    operator: Operator,
    public_domain: String,
}

/// One delimiter-bounded listing: objects at this level and the sub-prefixes below it.
struct Level {
    objects: Vec<RemoteObjectDescriptor>,
    prefixes: Vec<String>,
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_start_matches(KEY_DELIMITER);
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        ensure_trailing_slash(trimmed)
    }
}

impl OpenDalLister {
    /// Create a new lister; object URLs are composed under `public_domain`.
    pub fn new(operator: Operator, public_domain: impl Into<String>) -> Self {
        Self {
            operator,
            public_domain: public_domain.into(),
        }
    }

    async fn list_level(&self, prefix: &str) -> Result<Level> {
        let entries = self.operator.list(prefix).await?;
        let mut level = Level {
            objects: Vec::new(),
            prefixes: Vec::new(),
        };

        for entry in entries {
            let path = entry.path();
            // Some services return the listed prefix itself.
            if path == prefix || path == "/" {
                continue;
            }
            let meta = entry.metadata();
            if meta.mode().is_dir() {
                level.prefixes.push(path.to_string());
            } else {
                let mut size = meta.content_length();
                // Not every service reports sizes while listing.
                if size == 0 {
                    size = self.operator.stat(path).await?.content_length();
                }
                level.objects.push(RemoteObjectDescriptor::new(
                    path,
                    join_url(&self.public_domain, path),
                    size,
                ));
            }
        }
        Ok(level)
    }
}

impl Lister for OpenDalLister {
    async fn list(&self, prefix: &str) -> Result<Vec<RemoteObjectDescriptor>> {
        let mut objects = Vec::new();
        let mut queue = VecDeque::from([normalize_prefix(prefix)]);

        while let Some(current) = queue.pop_front() {
            let level = wrap_err!(
                self.list_level(&current).await,
                ListDirectoryFailed {
                    path: current.clone()
                }
            )?;
            log::debug!(
                "listed {current}: {} object(s), {} sub-prefix(es)",
                level.objects.len(),
                level.prefixes.len()
            );
            objects.extend(level.objects);
            queue.extend(level.prefixes);
        }

        Ok(objects)
    }
}
