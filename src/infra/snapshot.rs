// ============================================================
// Infra — Split Snapshots
// ============================================================
// Persists one partition as a small JSON document:
//
//   {
//     "format_version": 1,
//     "partition": "val",
//     "source": { "provider": "mnist", "root": "data/cache", "partition": "train" },
//     "transform": [ { "kind": "scale", "factor": 0.003921569 } ],
//     "indices": [ 5031, 17, ... ]
//   }
//
// The samples themselves are never copied: the snapshot is a
// reference to the raw source plus the index list and the
// transform, which is enough to rebuild the exact partition.
//
// File layout (defaults):
//   data/training_split/
//     train.json
//     val.json
//     test.json
//     split_config.json   ← written by ConfigStore

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::{RawDataset, SourceRef},
    partition::Partition,
    provider::DatasetProvider,
    transform::TransformPipeline,
};
use crate::domain::stage::PartitionKind;
use crate::error::{DataError, Result};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSnapshot {
    pub format_version: u32,
    pub partition: PartitionKind,
    pub source: SourceRef,
    pub transform: TransformPipeline,
    pub indices: Vec<usize>,
}

impl SplitSnapshot {
    pub fn capture(partition: &Partition) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            partition: partition.kind(),
            source: partition.raw().origin().clone(),
            transform: partition.raw().transform().clone(),
            indices: partition.indices().to_vec(),
        }
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        tracing::debug!(
            "Saved {} snapshot ({} indices) to '{}'",
            self.partition,
            self.indices.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DataError::MissingFile(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let snapshot: SplitSnapshot = serde_json::from_str(&json)?;

        if snapshot.format_version != FORMAT_VERSION {
            tracing::warn!(
                "Snapshot '{}' has format version {}, this build writes {}",
                path.display(),
                snapshot.format_version,
                FORMAT_VERSION
            );
        }
        Ok(snapshot)
    }

    /// Reopen the raw source through `provider` and rebuild the partition.
    ///
    /// Never downloads: the raw data must already be under `source.root`.
    pub fn restore(&self, provider: &dyn DatasetProvider) -> Result<Partition> {
        if provider.name() != self.source.provider {
            return Err(DataError::ProviderMismatch {
                expected: provider.name().to_string(),
                found: self.source.provider.clone(),
            });
        }

        if self.source.partition != self.partition.source() {
            return Err(DataError::InvalidConfig(format!(
                "{} snapshot points at the {} source",
                self.partition, self.source.partition
            )));
        }

        let raw = RawDataset::open(
            provider,
            &self.source.root,
            self.source.partition,
            false,
            self.transform.clone(),
        )?;

        let len = burn::data::dataset::Dataset::len(&raw);
        if let Some(&index) = self.indices.iter().find(|&&i| i >= len) {
            return Err(DataError::IndexOutOfRange { index, len });
        }

        Ok(Partition::new(self.partition, raw, self.indices.clone()))
    }
}
