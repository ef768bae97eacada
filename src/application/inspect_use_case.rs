// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Reloads persisted split snapshots and checks they still
// describe usable partitions:
//
//   Step 1: Load split_config.json            (infra)
//   Step 2: Load + restore each snapshot      (infra → data)
//   Step 3: Traverse each partition once      (data)
//   Step 4: Check train ∩ val = ∅             (here)
//
// Traversal runs on the NdArray CPU backend; only shapes and
// counts are reported.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use burn::backend::NdArray;
use serde::Serialize;

use crate::data::{
    partition::Partition,
    sequence::{SequenceLoader, SequenceOptions},
    splitter::SplitterConfig,
};
use crate::domain::stage::PartitionKind;
use crate::infra::{config_store::ConfigStore, snapshot::SplitSnapshot};

#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub kind: PartitionKind,
    pub snapshot: PathBuf,
    pub samples: usize,
    pub batches: usize,
    /// `[rows, values per sample]` of the first batch
    pub first_batch: Option<[usize; 2]>,
    pub label_counts: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub provider: String,
    pub partitions: Vec<PartitionSummary>,
    /// Kinds whose snapshot file was not found
    pub missing: Vec<PartitionKind>,
    /// `None` unless both train and val were restored
    pub train_val_disjoint: Option<bool>,
}

pub struct InspectUseCase {
    config: SplitterConfig,
}

impl InspectUseCase {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Use the config a previous split run saved at `path`.
    pub fn from_saved(path: &Path) -> Result<Self> {
        Ok(Self::new(ConfigStore::load(path)?))
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let provider = self.config.provider.build();
        let mut restored: BTreeMap<PartitionKind, Partition> = BTreeMap::new();
        let mut missing = Vec::new();

        for kind in [PartitionKind::Train, PartitionKind::Val, PartitionKind::Test] {
            let path = self.config.splits.get(kind);
            if !path.exists() {
                tracing::warn!("No {} snapshot at '{}'", kind, path.display());
                missing.push(kind);
                continue;
            }

            let partition = SplitSnapshot::load(path)
                .and_then(|snapshot| snapshot.restore(provider.as_ref()))
                .with_context(|| format!("Cannot restore {} split from '{}'", kind, path.display()))?;
            restored.insert(kind, partition);
        }

        let mut partitions = Vec::with_capacity(restored.len());
        for (kind, partition) in &restored {
            let summary = self
                .summarise(partition)
                .with_context(|| format!("Failed to traverse {kind} split"))?;
            partitions.push(summary);
        }

        let train_val_disjoint = match (restored.get(&PartitionKind::Train), restored.get(&PartitionKind::Val)) {
            (Some(train), Some(val)) => {
                let train: HashSet<usize> = train.indices().iter().copied().collect();
                Some(val.indices().iter().all(|i| !train.contains(i)))
            }
            _ => None,
        };

        Ok(InspectReport {
            provider: provider.name().to_string(),
            partitions,
            missing,
            train_val_disjoint,
        })
    }

    fn summarise(&self, partition: &Partition) -> Result<PartitionSummary> {
        let loader = SequenceLoader::<NdArray>::new(
            partition.clone(),
            Default::default(),
            SequenceOptions {
                batch_size: self.config.batch_size,
                shuffle: false,
                num_workers: self.config.num_workers,
                seed: Some(self.config.seed),
            },
        )?;

        let mut samples = 0;
        let mut batches = 0;
        let mut first_batch = None;
        let mut label_counts = BTreeMap::new();
        for batch in &loader {
            if first_batch.is_none() {
                first_batch = Some(batch.images.dims());
            }
            for &label in &batch.labels {
                *label_counts.entry(label).or_insert(0) += 1;
            }
            samples += batch.len();
            batches += 1;
        }

        tracing::info!("{}: {} samples in {} batches", partition.kind(), samples, batches);

        Ok(PartitionSummary {
            kind: partition.kind(),
            snapshot: self.config.splits.get(partition.kind()).clone(),
            samples,
            batches,
            first_batch,
            label_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::split_use_case::SplitUseCase;
    use crate::data::{provider::ProviderKind, splitter::SplitPaths};
    use crate::domain::stage::Stage;

    fn config(dir: &Path) -> SplitterConfig {
        SplitterConfig {
            provider: ProviderKind::Synthetic { train_len: 50, test_len: 30 },
            data_dir: dir.join("cache"),
            batch_size: 8,
            num_workers: 2,
            splits: SplitPaths::under(dir.join("splits")),
            ..Default::default()
        }
    }

    #[test]
    fn test_inspect_after_split() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        SplitUseCase::new(cfg.clone()).execute(Stage::All, true).unwrap();

        let report = InspectUseCase::from_saved(&ConfigStore::beside_splits(&cfg))
            .unwrap()
            .execute()
            .unwrap();

        assert_eq!(report.provider, "synthetic");
        assert!(report.missing.is_empty());
        assert_eq!(report.train_val_disjoint, Some(true));

        let samples: Vec<usize> = report.partitions.iter().map(|p| p.samples).collect();
        assert_eq!(samples, vec![40, 10, 30]);

        let train = &report.partitions[0];
        assert_eq!(train.batches, 5);
        assert_eq!(train.first_batch, Some([8, 784]));
        assert_eq!(train.label_counts.values().sum::<usize>(), 40);

        // synthetic labels are index % 10, so val must match its stored indices
        let val = &report.partitions[1];
        let val_split = SplitSnapshot::load(&cfg.splits.val).unwrap();
        let mut expected: BTreeMap<usize, usize> = BTreeMap::new();
        for &i in &val_split.indices {
            *expected.entry(i % 10).or_insert(0) += 1;
        }
        assert_eq!(val.label_counts, expected);
    }

    #[test]
    fn test_inspect_reports_missing_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let report = InspectUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(
            report.missing,
            vec![PartitionKind::Train, PartitionKind::Val, PartitionKind::Test]
        );
        assert!(report.partitions.is_empty());
        assert_eq!(report.train_val_disjoint, None);
    }
}
