// Boxing helpers for transfer errors that carry their cause
use crate::error::Error;

/// Sources a transfer variant can box: errors already in the crate's enum
/// (from a nested helper) and raw OpenDAL failures.
pub trait IntoOssyncError {
    fn into_error(self) -> Error;
}

impl IntoOssyncError for Error {
    fn into_error(self) -> Error {
        self
    }
}

impl IntoOssyncError for opendal::Error {
    fn into_error(self) -> Error {
        self.into()
    }
}

/// Map the error side of `$expr` into `Error::$variant`, boxing it as `source`.
///
/// ```ignore
/// wrap_err!(
///     self.operator.write_with(key, buffer).await,
///     PutFailed { remote_path: key.to_string() }
/// )?;
/// ```
#[macro_export]
macro_rules! wrap_err {
    ($expr:expr, $variant:ident { $($field:ident : $value:expr),* $(,)? }) => {{
        $expr.map_err(|e| {
            let src: $crate::error::Error = $crate::storage::utils::error::IntoOssyncError::into_error(e);
            $crate::error::Error::$variant { $($field: $value),*, source: Box::new(src) }
        })
    }};
}
