use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InternalError {
    #[error("Failed to create directory {path:?}")]
    CreateDirectoryError { path: PathBuf },

    #[error("Failed to write to file {path:?}")]
    WriteFileError { path: PathBuf },

    #[error("Failed to clean up file {path:?}")]
    CleanupFileError { path: PathBuf },

    #[error("Failed to persist photo record for {path:?}")]
    PersistRecordError { path: PathBuf },
}
