// ============================================================
// Domain — Stages and Partitions
// ============================================================
// Stage          selects which partitions build_splits (re)builds:
//                  Fit  → train + val
//                  Test → test
//                  All  → both (the "no stage given" case)
//
// SourcePartition is the flag a dataset provider understands:
// its train-flagged or its test-flagged raw data.
//
// PartitionKind names the three subsets the splitter produces.
// Train and val are both carved from the train-flagged source;
// test is the whole test-flagged source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fit,
    Test,
    #[default]
    All,
}

impl Stage {
    pub fn includes_fit(self) -> bool {
        matches!(self, Stage::Fit | Stage::All)
    }

    pub fn includes_test(self) -> bool {
        matches!(self, Stage::Test | Stage::All)
    }
}

/// `None` means "every stage".
impl From<Option<Stage>> for Stage {
    fn from(stage: Option<Stage>) -> Self {
        stage.unwrap_or(Stage::All)
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(Stage::Fit),
            "test" => Ok(Stage::Test),
            "all" | "none" => Ok(Stage::All),
            other => Err(format!("unknown stage '{other}' (expected fit, test or all)")),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fit => write!(f, "fit"),
            Stage::Test => write!(f, "test"),
            Stage::All => write!(f, "all"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePartition {
    Train,
    Test,
}

impl SourcePartition {
    pub fn is_train(self) -> bool {
        self == SourcePartition::Train
    }
}

impl fmt::Display for SourcePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePartition::Train => write!(f, "train"),
            SourcePartition::Test => write!(f, "test"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Train,
    Val,
    Test,
}

impl PartitionKind {
    /// The raw source a partition of this kind is drawn from.
    pub fn source(self) -> SourcePartition {
        match self {
            PartitionKind::Train | PartitionKind::Val => SourcePartition::Train,
            PartitionKind::Test => SourcePartition::Test,
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionKind::Train => write!(f, "train"),
            PartitionKind::Val => write!(f, "val"),
            PartitionKind::Test => write!(f, "test"),
        }
    }
}
