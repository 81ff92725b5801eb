use snafu::Snafu;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Environment variable '{key}' is required but not found"))]
    MissingEnvVar { key: String },

    #[snafu(display("Unsupported storage provider: {provider}"))]
    UnsupportedProvider { provider: String },

    #[snafu(display("Storage configuration is missing '{field}'"))]
    MissingConfig { field: &'static str },

    #[snafu(display("Invalid value '{value}' for {key}"))]
    InvalidConfigValue { key: String, value: String },

    #[snafu(display("Upload argument '{argument}' must not be empty"))]
    InvalidUploadArgument { argument: &'static str },

    #[snafu(display("Path does not exist: {}", path.display()))]
    PathNotFound { path: PathBuf },

    #[snafu(display("Partial upload failure: {} file(s) failed to upload: {}", failed_paths.len(), failed_paths.join(", ")))]
    PartialUpload { failed_paths: Vec<String> },

    #[snafu(display("Partial deletion failure: {} key(s) failed to delete: {}", failed_keys.len(), failed_keys.join(", ")))]
    PartialDeletion { failed_keys: Vec<String> },

    #[snafu(display("Failed to upload '{local_path}' to '{remote_path}': {source}"))]
    UploadFailed {
        local_path: String,
        remote_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to put '{remote_path}': {source}"))]
    PutFailed {
        remote_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to delete '{remote_path}': {source}"))]
    DeleteFailed {
        remote_path: String,
        source: Box<Error>,
    },

    #[snafu(display("Failed to download '{remote_path}' to '{local_path}'"))]
    DownloadIncomplete {
        remote_path: String,
        local_path: String,
    },

    #[snafu(display("Failed to list directory '{path}': {source}"))]
    ListDirectoryFailed { path: String, source: Box<Error> },

    #[snafu(display("OpenDAL error: {source}"))]
    OpenDal { source: opendal::Error },

    #[snafu(display("HTTP error: {source}"))]
    Http { source: reqwest::Error },

    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
}

impl From<opendal::Error> for Error {
    fn from(error: opendal::Error) -> Self {
        Error::OpenDal { source: error }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Http { source: error }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io { source: error }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json { source: error }
    }
}
