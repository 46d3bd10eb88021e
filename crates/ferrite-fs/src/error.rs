use ferrite_disk::DiskError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("'{0}' is not a directory")]
    NotADirectory(String),

    #[error("'{0}' is not a regular file")]
    NotAFile(String),

    #[error("permission denied: {op} '{name}'")]
    PermissionDenied { name: String, op: &'static str },

    #[error("copying a directory is not supported")]
    UnsupportedOperation,

    #[error("disk error: {0}")]
    Disk(#[from] DiskError),
}
