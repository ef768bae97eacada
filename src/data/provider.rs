// ============================================================
// Data — Dataset Providers
// ============================================================
// A provider knows where a named dataset lives on disk, how to
// fetch it when it is missing, and how to open its train- or
// test-flagged partition as a burn Dataset of ImageItems.
//
// Implementations:
//   - MnistProvider     → MNIST / Fashion-MNIST IDX files
//   - SyntheticProvider → deterministic in-memory images
//
// ProviderKind is the serialisable selector used in configs.

use std::{path::Path, sync::Arc};

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::{mnist::MnistProvider, synthetic::SyntheticProvider};
use crate::domain::{sample::ImageItem, stage::SourcePartition};
use crate::error::Result;

/// Shared handle to a loaded raw source.
pub type SourceHandle = Arc<dyn Dataset<ImageItem>>;

pub trait DatasetProvider: Send + Sync {
    /// Stable identifier recorded in split snapshots.
    fn name(&self) -> &str;

    /// Whether every file of `partition` is present under `root`.
    fn is_local(&self, root: &Path, partition: SourcePartition) -> bool;

    /// Fetch `partition` into `root` from the remote source.
    fn download(&self, root: &Path, partition: SourcePartition) -> Result<()>;

    /// Open `partition` from `root`. Never downloads.
    fn load(&self, root: &Path, partition: SourcePartition) -> Result<SourceHandle>;

    /// Download `partition` only when it is not already present.
    fn ensure_local(&self, root: &Path, partition: SourcePartition) -> Result<()> {
        if self.is_local(root, partition) {
            tracing::debug!("{} {} data already present in '{}'", self.name(), partition, root.display());
            return Ok(());
        }
        tracing::info!("Fetching {} {} data into '{}'", self.name(), partition, root.display());
        self.download(root, partition)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderKind {
    Mnist {
        #[serde(default)]
        mirror: Option<String>,
    },
    FashionMnist {
        #[serde(default)]
        mirror: Option<String>,
    },
    Synthetic {
        train_len: usize,
        test_len: usize,
    },
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::Mnist { mirror: None }
    }
}

impl ProviderKind {
    pub fn build(&self) -> Arc<dyn DatasetProvider> {
        match self {
            ProviderKind::Mnist { mirror } => {
                let provider = MnistProvider::digits();
                Arc::new(match mirror {
                    Some(url) => provider.with_mirror(url.clone()),
                    None => provider,
                })
            }
            ProviderKind::FashionMnist { mirror } => {
                let provider = MnistProvider::fashion();
                Arc::new(match mirror {
                    Some(url) => provider.with_mirror(url.clone()),
                    None => provider,
                })
            }
            ProviderKind::Synthetic { train_len, test_len } => {
                Arc::new(SyntheticProvider::new(*train_len, *test_len))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_names() {
        assert_eq!(ProviderKind::default().build().name(), "mnist");
        assert_eq!(ProviderKind::FashionMnist { mirror: None }.build().name(), "fashion-mnist");
        let synthetic = ProviderKind::Synthetic { train_len: 10, test_len: 4 };
        assert_eq!(synthetic.build().name(), "synthetic");
    }

    #[test]
    fn test_kind_json() {
        let kind: ProviderKind =
            serde_json::from_str(r#"{"kind":"synthetic","train_len":100,"test_len":20}"#).unwrap();
        assert_eq!(kind, ProviderKind::Synthetic { train_len: 100, test_len: 20 });

        let kind: ProviderKind = serde_json::from_str(r#"{"kind":"mnist"}"#).unwrap();
        assert_eq!(kind, ProviderKind::Mnist { mirror: None });
    }
}
