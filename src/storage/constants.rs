// Buffer related constants
pub const DEFAULT_BUFFER_SIZE: usize = 8192;
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

// Maximum number of in-flight uploads within one batch
pub const DEFAULT_UPLOAD_CONCURRENCY: usize = 16;

// Key separator used for prefix/delimiter listings
pub const KEY_DELIMITER: char = '/';

// Filesystem default
pub const DEFAULT_FS_ROOT: &str = "./storage";

pub const DEFAULT_OSS_ENDPOINT: &str = "https://oss-cn-hangzhou.aliyuncs.com";
