// ============================================================
// Data — Dataset Splitter
// ============================================================
// Turns a provider's raw data into three disjoint partitions
// and hands each one to the training consumer as a batched
// sequence:
//
//   ensure_local(stage)   → raw files present under data_dir
//   build_splits(stage)   → train / val (fit), test (test)
//   persist_splits()      → three JSON snapshots
//   *_sequence(device)    → SequenceLoader per partition
//
// How the fit split works:
//   The train-flagged source is loaded once. Its indices are
//   shuffled with a StdRng seeded from `config.seed` and cut
//   at floor(N * train_size):
//
//     [ 0 .. train_len )  → train (train_transforms)
//     [ train_len .. N )  → val   (test_transforms)
//
//   Both partitions view the same loaded samples; only the
//   transform applied on access differs.
//
// The test partition is always the whole test-flagged source.
//
// State only ever grows: once a partition is built it stays
// until the next build of the same stage replaces it with an
// identical one.

use std::{path::PathBuf, sync::Arc};

use burn::{data::dataset::Dataset, tensor::backend::Backend};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::RawDataset,
    partition::{plan_split, validate_train_size, Partition},
    provider::{DatasetProvider, ProviderKind},
    sequence::{SequenceLoader, SequenceOptions},
    transform::TransformPipeline,
};
use crate::domain::stage::{PartitionKind, SourcePartition, Stage};
use crate::error::{DataError, Result};
use crate::infra::snapshot::SplitSnapshot;

// ─── Configuration ────────────────────────────────────────────────────────────
/// Where each partition's snapshot is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitPaths {
    pub train: PathBuf,
    pub val: PathBuf,
    pub test: PathBuf,
}

impl Default for SplitPaths {
    fn default() -> Self {
        Self::under("data/training_split")
    }
}

impl SplitPaths {
    /// `<dir>/train.json`, `<dir>/val.json`, `<dir>/test.json`
    pub fn under(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            train: dir.join("train.json"),
            val: dir.join("val.json"),
            test: dir.join("test.json"),
        }
    }

    pub fn get(&self, kind: PartitionKind) -> &PathBuf {
        match kind {
            PartitionKind::Train => &self.train,
            PartitionKind::Val => &self.val,
            PartitionKind::Test => &self.test,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    pub provider: ProviderKind,
    pub data_dir: PathBuf,
    /// Fraction of the train-flagged source kept for training, in (0, 1)
    pub train_size: f64,
    pub train_transforms: TransformPipeline,
    /// Applied to the val and test partitions
    pub test_transforms: TransformPipeline,
    pub batch_size: usize,
    pub num_workers: usize,
    pub seed: u64,
    pub splits: SplitPaths,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            data_dir: PathBuf::from("data/cache"),
            train_size: 0.8,
            train_transforms: TransformPipeline::train_default(),
            test_transforms: TransformPipeline::eval_default(),
            batch_size: 128,
            num_workers: default_num_workers(),
            seed: 42,
            splits: SplitPaths::default(),
        }
    }
}

impl SplitterConfig {
    pub fn validate(&self) -> Result<()> {
        validate_train_size(self.train_size)?;
        if self.batch_size == 0 {
            return Err(DataError::InvalidConfig("batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Half the host's parallelism, rounded down.
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() / 2)
        .unwrap_or(0)
}

// ─── State ────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterState {
    Unconfigured,
    DataPresent,
    TrainValReady,
    TestReady,
    /// Train, val and test all built
    Ready,
}

// ─── DatasetSplitter ──────────────────────────────────────────────────────────
pub struct DatasetSplitter {
    config: SplitterConfig,
    provider: Arc<dyn DatasetProvider>,
    data_present: bool,
    train: Option<Partition>,
    val: Option<Partition>,
    test: Option<Partition>,
}

impl DatasetSplitter {
    /// Validate `config` and build the provider it names.
    pub fn from_config(config: SplitterConfig) -> Result<Self> {
        let provider = config.provider.build();
        Self::with_provider(config, provider)
    }

    /// Use `provider` instead of the one `config.provider` names.
    pub fn with_provider(config: SplitterConfig, provider: Arc<dyn DatasetProvider>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            data_present: false,
            train: None,
            val: None,
            test: None,
        })
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn DatasetProvider> {
        &self.provider
    }

    pub fn state(&self) -> SplitterState {
        let fit_ready = self.train.is_some() && self.val.is_some();
        match (fit_ready, self.test.is_some()) {
            (true, true) => SplitterState::Ready,
            (true, false) => SplitterState::TrainValReady,
            (false, true) => SplitterState::TestReady,
            (false, false) if self.data_present => SplitterState::DataPresent,
            (false, false) => SplitterState::Unconfigured,
        }
    }

    /// Make sure both the train- and test-flagged raw data exist under
    /// `data_dir`, downloading whatever is missing.
    ///
    /// Both sources are fetched whatever the stage, so a later stage never
    /// needs the network.
    pub fn ensure_local(&mut self, stage: impl Into<Stage>) -> Result<()> {
        let stage = stage.into();
        tracing::info!(
            "Ensuring {} data is local in '{}' (stage: {})",
            self.provider.name(),
            self.config.data_dir.display(),
            stage
        );

        for partition in [SourcePartition::Train, SourcePartition::Test] {
            self.provider.ensure_local(&self.config.data_dir, partition)?;
        }
        self.data_present = true;
        Ok(())
    }

    /// Build the partitions `stage` covers. `Stage::All` builds all three.
    pub fn build_splits(&mut self, stage: impl Into<Stage>) -> Result<()> {
        let stage = stage.into();
        if stage.includes_fit() {
            self.build_fit()?;
        }
        if stage.includes_test() {
            self.build_test()?;
        }
        Ok(())
    }

    fn build_fit(&mut self) -> Result<()> {
        let cfg = &self.config;
        let source = RawDataset::open(
            self.provider.as_ref(),
            &cfg.data_dir,
            PartitionKind::Train.source(),
            false,
            cfg.train_transforms.clone(),
        )?;
        self.data_present = true;

        let plan = plan_split(source.len(), cfg.train_size, cfg.seed)?;
        let val_source = source.with_transform(cfg.test_transforms.clone());

        tracing::info!(
            "Fit split: {} train / {} val from {} samples (train_size {}, seed {})",
            plan.train.len(),
            plan.val.len(),
            source.len(),
            cfg.train_size,
            cfg.seed
        );

        self.train = Some(Partition::new(PartitionKind::Train, source, plan.train));
        self.val = Some(Partition::new(PartitionKind::Val, val_source, plan.val));
        Ok(())
    }

    fn build_test(&mut self) -> Result<()> {
        let cfg = &self.config;
        let source = RawDataset::open(
            self.provider.as_ref(),
            &cfg.data_dir,
            PartitionKind::Test.source(),
            false,
            cfg.test_transforms.clone(),
        )?;
        self.data_present = true;

        tracing::info!("Test split: {} samples", source.len());
        self.test = Some(Partition::full(PartitionKind::Test, source));
        Ok(())
    }

    /// Write train, val and test snapshots to the configured paths.
    ///
    /// The test partition is built on demand; train and val must already
    /// exist. Nothing is written when they don't.
    pub fn persist_splits(&mut self) -> Result<()> {
        if self.train.is_none() {
            return Err(DataError::MissingPartition(PartitionKind::Train));
        }
        if self.val.is_none() {
            return Err(DataError::MissingPartition(PartitionKind::Val));
        }
        if self.test.is_none() {
            tracing::info!("Test partition not built yet, building it before persisting");
            self.build_test()?;
        }

        for kind in [PartitionKind::Train, PartitionKind::Val, PartitionKind::Test] {
            let partition = self.partition(kind)?;
            SplitSnapshot::capture(partition).save(self.config.splits.get(kind))?;
        }

        tracing::info!(
            "Persisted splits to '{}', '{}', '{}'",
            self.config.splits.train.display(),
            self.config.splits.val.display(),
            self.config.splits.test.display()
        );
        Ok(())
    }

    // ─── Accessors ────────────────────────────────────────────────────────────

    pub fn partition(&self, kind: PartitionKind) -> Result<&Partition> {
        let slot = match kind {
            PartitionKind::Train => &self.train,
            PartitionKind::Val => &self.val,
            PartitionKind::Test => &self.test,
        };
        slot.as_ref().ok_or(DataError::MissingPartition(kind))
    }

    pub fn train(&self) -> Result<&Partition> {
        self.partition(PartitionKind::Train)
    }

    pub fn val(&self) -> Result<&Partition> {
        self.partition(PartitionKind::Val)
    }

    pub fn test(&self) -> Result<&Partition> {
        self.partition(PartitionKind::Test)
    }

    // ─── Sequence producers ───────────────────────────────────────────────────

    /// Shuffled on every traversal.
    pub fn train_sequence<B: Backend>(&self, device: &B::Device) -> Result<SequenceLoader<B>> {
        self.sequence(PartitionKind::Train, true, device)
    }

    pub fn val_sequence<B: Backend>(&self, device: &B::Device) -> Result<SequenceLoader<B>> {
        self.sequence(PartitionKind::Val, false, device)
    }

    /// Unlike `persist_splits`, this does not build a missing test partition.
    pub fn test_sequence<B: Backend>(&self, device: &B::Device) -> Result<SequenceLoader<B>> {
        self.sequence(PartitionKind::Test, false, device)
    }

    fn sequence<B: Backend>(
        &self,
        kind: PartitionKind,
        shuffle: bool,
        device: &B::Device,
    ) -> Result<SequenceLoader<B>> {
        let partition = self.partition(kind)?.clone();
        SequenceLoader::new(
            partition,
            device.clone(),
            SequenceOptions {
                batch_size: self.config.batch_size,
                shuffle,
                num_workers: self.config.num_workers,
                seed: Some(self.config.seed),
            },
        )
    }
}

impl std::fmt::Debug for DatasetSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetSplitter")
            .field("provider", &self.provider.name())
            .field("state", &self.state())
            .field("train", &self.train)
            .field("val", &self.val)
            .field("test", &self.test)
            .finish()
    }
}
