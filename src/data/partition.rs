// ============================================================
// Data — Partitions and the Seeded Split Plan
// ============================================================
// A Partition is an index view over a RawDataset:
//
//   partition.get(i) == raw.get(indices[i])
//
// The train/val split shuffles 0..N once with a seeded StdRng
// (Fisher-Yates via SliceRandom) and cuts the permutation in two:
//
//   train_len = floor(N * train_size)
//   val_len   = N - train_len
//
// The same (N, train_size, seed) always produces the same plan,
// the two ranges never overlap and together cover 0..N.

use std::sync::Arc;

use burn::data::dataset::Dataset;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::RawDataset;
use crate::domain::{sample::ImageItem, stage::PartitionKind};
use crate::error::{DataError, Result};

/// Index sets for the train and val partitions of one raw source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<usize>,
    pub val: Vec<usize>,
}

/// Shuffle `0..len` with `seed` and cut it at `floor(len * train_size)`.
pub fn plan_split(len: usize, train_size: f64, seed: u64) -> Result<SplitPlan> {
    validate_train_size(train_size)?;

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train_len = ((len as f64) * train_size).floor() as usize;
    let val = indices.split_off(train_len.min(len));

    tracing::debug!(
        "Split plan over {} samples: {} train / {} val (seed {})",
        len,
        indices.len(),
        val.len(),
        seed
    );

    Ok(SplitPlan { train: indices, val })
}

pub fn validate_train_size(train_size: f64) -> Result<()> {
    // NaN fails both comparisons
    if train_size > 0.0 && train_size < 1.0 {
        Ok(())
    } else {
        Err(DataError::InvalidConfig(format!(
            "train_size must lie strictly between 0 and 1, got {train_size}"
        )))
    }
}

// ─── Partition ────────────────────────────────────────────────────────────────
#[derive(Clone)]
pub struct Partition {
    kind: PartitionKind,
    raw: RawDataset,
    indices: Arc<[usize]>,
}

impl Partition {
    pub fn new(kind: PartitionKind, raw: RawDataset, indices: Vec<usize>) -> Self {
        Self {
            kind,
            raw,
            indices: indices.into(),
        }
    }

    /// A partition covering every sample of `raw`, in stored order.
    pub fn full(kind: PartitionKind, raw: RawDataset) -> Self {
        let indices = (0..raw.len()).collect();
        Self::new(kind, raw, indices)
    }

    pub fn kind(&self) -> PartitionKind {
        self.kind
    }

    pub fn raw(&self) -> &RawDataset {
        &self.raw
    }

    /// Positions in the raw source, in partition order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl Dataset<ImageItem> for Partition {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.indices.get(index).and_then(|&pos| self.raw.get(pos))
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("kind", &self.kind)
            .field("source", self.raw.origin())
            .field("len", &self.indices.len())
            .finish()
    }
}
