// Synthetic provider: deterministic 28×28 grayscale images held in memory.
//
// Pixel values are a pure function of (sample index, pixel position) and the
// label is `index % 10`, so any partition can be checked against the source
// without storing fixtures. Always local; downloading is a no-op.

use std::{path::Path, sync::Arc};

use burn::data::dataset::InMemDataset;

use crate::data::provider::{DatasetProvider, SourceHandle};
use crate::domain::{sample::ImageItem, stage::SourcePartition};
use crate::error::Result;

pub const SIDE: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProvider {
    train_len: usize,
    test_len: usize,
}

impl SyntheticProvider {
    pub fn new(train_len: usize, test_len: usize) -> Self {
        Self { train_len, test_len }
    }

    /// The sample at `index` of `partition`.
    pub fn sample(partition: SourcePartition, index: usize) -> ImageItem {
        let offset = if partition.is_train() { 0 } else { 131 };
        let pixels = (0..SIDE * SIDE)
            .map(|p| ((index * 7 + p * 13 + offset) % 256) as f32)
            .collect();
        ImageItem::grayscale(index, pixels, SIDE, SIDE, index % 10)
    }

    fn len_of(&self, partition: SourcePartition) -> usize {
        match partition {
            SourcePartition::Train => self.train_len,
            SourcePartition::Test => self.test_len,
        }
    }
}

impl DatasetProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn is_local(&self, _root: &Path, _partition: SourcePartition) -> bool {
        true
    }

    fn download(&self, _root: &Path, _partition: SourcePartition) -> Result<()> {
        Ok(())
    }

    fn load(&self, _root: &Path, partition: SourcePartition) -> Result<SourceHandle> {
        let items: Vec<ImageItem> = (0..self.len_of(partition))
            .map(|i| Self::sample(partition, i))
            .collect();
        Ok(Arc::new(InMemDataset::new(items)))
    }
}
