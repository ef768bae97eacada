//! Error types for the data pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::stage::PartitionKind;

/// Errors raised while fetching, splitting, loading or persisting datasets.
///
/// Storage and transport failures are carried through unchanged so callers
/// see the provider's native error.
#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("dataset file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid IDX data: {0}")]
    InvalidFormat(String),

    #[error("image/label count mismatch: {images} images vs {labels} labels")]
    CountMismatch { images: usize, labels: usize },

    #[error("missing {0} partition: build_splits has not produced it")]
    MissingPartition(PartitionKind),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("split snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("snapshot index {index} out of range for a source of {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("snapshot references provider '{found}', expected '{expected}'")]
    ProviderMismatch { expected: String, found: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for data pipeline operations
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_partition_display() {
        let err = DataError::MissingPartition(PartitionKind::Val);
        assert!(err.to_string().contains("missing val partition"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume");
        let err = DataError::from(io);
        assert_eq!(err.to_string(), "read-only volume");
        assert!(matches!(err, DataError::Io(ref e) if e.kind() == std::io::ErrorKind::PermissionDenied));
    }
}
