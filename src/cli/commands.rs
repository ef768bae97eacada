// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands: `prepare`, `split`, `inspect`.
//
// prepare and split share CommonArgs. Each flag given on the
// command line overrides the matching field of the config
// (file or defaults); flags left out leave it untouched.
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use crate::data::{
    provider::ProviderKind,
    splitter::{SplitPaths, SplitterConfig},
};
use crate::domain::stage::Stage;
use crate::infra::config_store::ConfigStore;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the raw train and test data if missing
    Prepare(CommonArgs),

    /// Build train/val/test splits and persist them
    Split(SplitArgs),

    /// Restore persisted splits and report their contents
    Inspect(InspectArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderChoice {
    Mnist,
    FashionMnist,
    /// Offline generated images
    Synthetic,
}

#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderChoice>,

    /// Base URL to fetch gzipped IDX files from (mnist providers)
    #[arg(long)]
    pub mirror: Option<String>,

    /// Directory raw dataset files are stored under
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Fraction of the train-flagged data used for training, in (0, 1)
    #[arg(long)]
    pub train_size: Option<f64>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Loader worker threads (0 = load on the calling thread)
    #[arg(long)]
    pub num_workers: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for train.json / val.json / test.json
    #[arg(long)]
    pub split_dir: Option<PathBuf>,
}

impl CommonArgs {
    /// Config file (or defaults) with flag overrides applied.
    pub fn resolve(&self) -> Result<SplitterConfig> {
        let mut cfg = match &self.config {
            Some(path) => ConfigStore::load(path)?,
            None => SplitterConfig::default(),
        };

        if let Some(choice) = self.provider {
            cfg.provider = match choice {
                ProviderChoice::Mnist => ProviderKind::Mnist { mirror: self.mirror.clone() },
                ProviderChoice::FashionMnist => ProviderKind::FashionMnist { mirror: self.mirror.clone() },
                ProviderChoice::Synthetic => ProviderKind::Synthetic {
                    train_len: 60_000,
                    test_len: 10_000,
                },
            };
        } else if let Some(url) = &self.mirror {
            match &mut cfg.provider {
                ProviderKind::Mnist { mirror } | ProviderKind::FashionMnist { mirror } => {
                    *mirror = Some(url.clone());
                }
                ProviderKind::Synthetic { .. } => {
                    tracing::warn!("--mirror has no effect on the synthetic provider");
                }
            }
        }

        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(train_size) = self.train_size {
            cfg.train_size = train_size;
        }
        if let Some(batch_size) = self.batch_size {
            cfg.batch_size = batch_size;
        }
        if let Some(num_workers) = self.num_workers {
            cfg.num_workers = num_workers;
        }
        if let Some(seed) = self.seed {
            cfg.seed = seed;
        }
        if let Some(dir) = &self.split_dir {
            cfg.splits = SplitPaths::under(dir);
        }

        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Which partitions to build: fit (train + val), test, or all
    #[arg(long, default_value_t = Stage::All)]
    pub stage: Stage,

    /// Build the splits without writing snapshots
    #[arg(long)]
    pub no_persist: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// split_config.json written by a previous `split`
    #[arg(long, default_value = "data/training_split/split_config.json")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = CommonArgs {
            provider: Some(ProviderChoice::Synthetic),
            train_size: Some(0.9),
            seed: Some(1),
            split_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        let cfg = args.resolve().unwrap();
        assert!(matches!(cfg.provider, ProviderKind::Synthetic { .. }));
        assert_eq!(cfg.train_size, 0.9);
        assert_eq!(cfg.seed, 1);
        assert_eq!(cfg.splits.test, PathBuf::from("out/test.json"));
        assert_eq!(cfg.batch_size, 128);
    }

    #[test]
    fn test_mirror_applies_to_configured_provider() {
        let args = CommonArgs {
            mirror: Some("http://localhost:8000/".into()),
            ..Default::default()
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(
            cfg.provider,
            ProviderKind::Mnist { mirror: Some("http://localhost:8000/".into()) }
        );
    }
}
