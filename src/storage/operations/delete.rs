// Delete operation trait and implementation
use crate::error::Result;
use crate::wrap_err;
use opendal::Operator;

/// Trait for deleting objects from storage.
pub trait Deleter {
    /// Delete a single object.
    ///
    /// # Arguments
    /// * `key` - Object key to delete
    ///
    /// # Returns
    /// * `Result<()>` - Success, or the failure already logged
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Implementation of Deleter for OpenDAL Operator.
pub struct OpenDalDeleter {
    operator: Operator,
}

impl OpenDalDeleter {
    /// Create a new deleter with the given OpenDAL operator.
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl Deleter for OpenDalDeleter {
    async fn delete(&self, key: &str) -> Result<()> {
        log::info!("delete {key} starting...");
        wrap_err!(
            self.operator.delete(key).await,
            DeleteFailed {
                remote_path: key.to_string()
            }
        )
        .inspect_err(|e| log::error!("{e}"))?;
        log::info!("delete {key} finished");
        Ok(())
    }
}
