// ============================================================
// Layer 2 — Split Use Case
// ============================================================
// Orchestrates the splitting pipeline in order:
//
//   Step 1: Validate config, build provider   (data)
//   Step 2: Make raw data local               (data → infra)
//   Step 3: Build partitions for the stage    (data)
//   Step 4: Persist snapshots                 (infra)
//   Step 5: Save the effective config         (infra)
//
// `prepare` stops after step 2.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use serde::Serialize;

use crate::data::splitter::{DatasetSplitter, SplitterConfig, SplitterState};
use crate::domain::stage::{PartitionKind, Stage};
use crate::infra::config_store::ConfigStore;

/// What a split run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub provider: String,
    pub stage: Stage,
    pub state: SplitterState,
    pub train_len: Option<usize>,
    pub val_len: Option<usize>,
    pub test_len: Option<usize>,
    /// Snapshot and config files written, empty when nothing was persisted
    pub written: Vec<PathBuf>,
}

pub struct SplitUseCase {
    config: SplitterConfig,
}

impl SplitUseCase {
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Download whatever raw data is missing.
    pub fn prepare(&self) -> Result<SplitterState> {
        let mut splitter = self.splitter()?;
        splitter
            .ensure_local(Stage::All)
            .with_context(|| format!("Cannot make {} data local", splitter.provider().name()))?;
        Ok(splitter.state())
    }

    /// Make data local and build the partitions `stage` covers.
    pub fn build(&self, stage: Stage) -> Result<DatasetSplitter> {
        let mut splitter = self.splitter()?;

        // ── Step 2: Raw data ─────────────────────────────────────────────────
        splitter
            .ensure_local(stage)
            .with_context(|| format!("Cannot make {} data local", splitter.provider().name()))?;

        // ── Step 3: Partitions ───────────────────────────────────────────────
        splitter
            .build_splits(stage)
            .with_context(|| format!("Failed to build splits for stage '{stage}'"))?;

        Ok(splitter)
    }

    pub fn execute(&self, stage: Stage, persist: bool) -> Result<SplitReport> {
        let mut splitter = self.build(stage)?;
        let mut written = Vec::new();

        // ── Steps 4 + 5: Persistence ─────────────────────────────────────────
        // Snapshots need train and val, which only a fit build produces.
        if persist && stage.includes_fit() {
            splitter.persist_splits().context("Failed to persist splits")?;
            let splits = &self.config.splits;
            written.extend([splits.train.clone(), splits.val.clone(), splits.test.clone()]);

            let config_path = ConfigStore::beside_splits(&self.config);
            ConfigStore::save(&self.config, &config_path)?;
            written.push(config_path);
        } else if persist {
            tracing::warn!("Stage '{}' builds no train/val partitions; nothing persisted", stage);
        }

        let len_of = |kind: PartitionKind| splitter.partition(kind).ok().map(|p| p.len());

        Ok(SplitReport {
            provider: splitter.provider().name().to_string(),
            stage,
            state: splitter.state(),
            train_len: len_of(PartitionKind::Train),
            val_len: len_of(PartitionKind::Val),
            test_len: len_of(PartitionKind::Test),
            written,
        })
    }

    fn splitter(&self) -> Result<DatasetSplitter> {
        DatasetSplitter::from_config(self.config.clone()).context("Invalid splitter configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{provider::ProviderKind, splitter::SplitPaths};

    fn config(dir: &std::path::Path) -> SplitterConfig {
        SplitterConfig {
            provider: ProviderKind::Synthetic { train_len: 100, test_len: 40 },
            data_dir: dir.join("cache"),
            num_workers: 0,
            splits: SplitPaths::under(dir.join("splits")),
            ..Default::default()
        }
    }

    #[test]
    fn test_execute_all_persists_everything() {
        let dir = tempfile::tempdir().unwrap();
        let report = SplitUseCase::new(config(dir.path())).execute(Stage::All, true).unwrap();

        assert_eq!(report.state, SplitterState::Ready);
        assert_eq!(report.train_len, Some(80));
        assert_eq!(report.val_len, Some(20));
        assert_eq!(report.test_len, Some(40));
        assert_eq!(report.written.len(), 4);
        assert!(report.written.iter().all(|p| p.exists()));
    }

    #[test]
    fn test_execute_test_stage_skips_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let report = SplitUseCase::new(config(dir.path())).execute(Stage::Test, true).unwrap();

        assert_eq!(report.state, SplitterState::TestReady);
        assert_eq!(report.train_len, None);
        assert!(report.written.is_empty());
        assert!(!dir.path().join("splits").exists());
    }

    #[test]
    fn test_prepare_reports_data_present() {
        let dir = tempfile::tempdir().unwrap();
        let state = SplitUseCase::new(config(dir.path())).prepare().unwrap();
        assert_eq!(state, SplitterState::DataPresent);
    }
}
