// ============================================================
// Data — Sequence Loader
// ============================================================
// Produces the batched sequence a training or evaluation loop
// iterates over:
//
//   loader.iter()  →  ImageBatch, ImageBatch, ..., (short) ImageBatch
//
// Each call to iter() starts a fresh traversal:
//   - shuffle = true  → a new permutation per traversal, drawn
//                       from one seeded RNG, so the sequence of
//                       epochs is reproducible but no two
//                       traversals are alike
//   - shuffle = false → stored partition order, every time
//
// With num_workers > 0 the samples of each batch are fetched
// and transformed on a dedicated rayon pool of that many
// threads. Collection preserves order, so parallel and
// sequential traversals yield identical batches.

use std::sync::{Mutex, PoisonError};

use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    tensor::backend::Backend,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::data::{
    batcher::{ImageBatch, ImageBatcher},
    partition::Partition,
};
use crate::domain::sample::ImageItem;
use crate::error::{DataError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOptions {
    pub batch_size: usize,
    pub shuffle: bool,
    /// 0 = fetch on the calling thread
    pub num_workers: usize,
    /// Seed for the shuffle RNG; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle: false,
            num_workers: 0,
            seed: None,
        }
    }
}

pub struct SequenceLoader<B: Backend> {
    partition: Partition,
    batcher: ImageBatcher<B>,
    options: SequenceOptions,
    rng: Mutex<StdRng>,
    pool: Option<ThreadPool>,
}

impl<B: Backend> SequenceLoader<B> {
    pub fn new(partition: Partition, device: B::Device, options: SequenceOptions) -> Result<Self> {
        if options.batch_size == 0 {
            return Err(DataError::InvalidConfig("batch_size must be at least 1".into()));
        }

        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let pool = if options.num_workers > 0 {
            let kind = partition.kind();
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(options.num_workers)
                    .thread_name(move |i| format!("{kind}-loader-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        tracing::debug!(
            "{} loader: {} samples, batch_size={}, shuffle={}, workers={}",
            partition.kind(),
            partition.len(),
            options.batch_size,
            options.shuffle,
            options.num_workers
        );

        Ok(Self {
            partition,
            batcher: ImageBatcher::new(device),
            options,
            rng: Mutex::new(rng),
            pool,
        })
    }

    pub fn num_items(&self) -> usize {
        self.partition.len()
    }

    pub fn num_batches(&self) -> usize {
        self.num_items().div_ceil(self.options.batch_size)
    }

    /// Start a traversal.
    pub fn iter(&self) -> SequenceIter<'_, B> {
        SequenceIter {
            loader: self,
            order: self.traversal_order(),
            cursor: 0,
        }
    }

    fn traversal_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.partition.len()).collect();
        if self.options.shuffle {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            order.shuffle(&mut *rng);
        }
        order
    }

    fn fetch(&self, positions: &[usize]) -> Vec<ImageItem> {
        let partition = &self.partition;
        match &self.pool {
            Some(pool) if positions.len() > 1 => pool.install(|| {
                positions
                    .par_iter()
                    .filter_map(|&i| partition.get(i))
                    .collect()
            }),
            _ => positions.iter().filter_map(|&i| partition.get(i)).collect(),
        }
    }
}

impl<'a, B: Backend> IntoIterator for &'a SequenceLoader<B> {
    type Item = ImageBatch<B>;
    type IntoIter = SequenceIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ─── SequenceIter ─────────────────────────────────────────────────────────────
/// One traversal over a loader's partition.
pub struct SequenceIter<'a, B: Backend> {
    loader: &'a SequenceLoader<B>,
    order: Vec<usize>,
    cursor: usize,
}

impl<B: Backend> Iterator for SequenceIter<'_, B> {
    type Item = ImageBatch<B>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }
        let end = (self.cursor + self.loader.options.batch_size).min(self.order.len());
        let items = self.loader.fetch(&self.order[self.cursor..end]);
        self.cursor = end;
        Some(self.loader.batcher.batch(items))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.cursor).div_ceil(self.loader.options.batch_size);
        (remaining, Some(remaining))
    }
}

impl<B: Backend> ExactSizeIterator for SequenceIter<'_, B> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use burn::backend::NdArray;

    use crate::data::{dataset::RawDataset, synthetic::SyntheticProvider, transform::TransformPipeline};
    use crate::domain::stage::{PartitionKind, SourcePartition};

    fn partition(n: usize) -> Partition {
        let raw = RawDataset::open(
            &SyntheticProvider::new(n, 0),
            Path::new("unused"),
            SourcePartition::Train,
            false,
            TransformPipeline::eval_default(),
        )
        .unwrap();
        // reversed so stored order differs from raw order
        Partition::new(PartitionKind::Val, raw, (0..n).rev().collect())
    }

    fn loader(n: usize, options: SequenceOptions) -> SequenceLoader<NdArray> {
        SequenceLoader::new(partition(n), Default::default(), options).unwrap()
    }

    fn traverse(loader: &SequenceLoader<NdArray>) -> Vec<usize> {
        loader.iter().flat_map(|batch| batch.positions).collect()
    }

    #[test]
    fn test_batch_sizes_with_short_tail() {
        let loader = loader(10, SequenceOptions { batch_size: 4, ..Default::default() });
        assert_eq!(loader.num_batches(), 3);

        let iter = loader.iter();
        assert_eq!(iter.len(), 3);
        let sizes: Vec<usize> = iter.map(|b| b.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_unshuffled_keeps_stored_order() {
        let loader = loader(25, SequenceOptions { batch_size: 8, ..Default::default() });
        let expected: Vec<usize> = (0..25).rev().collect();
        assert_eq!(traverse(&loader), expected);
        assert_eq!(traverse(&loader), expected);
    }

    #[test]
    fn test_shuffled_traversals_differ() {
        let loader = loader(
            100,
            SequenceOptions {
                batch_size: 16,
                shuffle: true,
                seed: Some(42),
                ..Default::default()
            },
        );
        let first = traverse(&loader);
        let second = traverse(&loader);
        assert_ne!(first, second);

        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible_across_loaders() {
        let options = SequenceOptions {
            batch_size: 10,
            shuffle: true,
            seed: Some(7),
            ..Default::default()
        };
        let a = loader(50, options);
        let b = loader(50, options);
        assert_eq!(traverse(&a), traverse(&b));
        assert_eq!(traverse(&a), traverse(&b));
    }

    #[test]
    fn test_workers_preserve_order() {
        let sequential = loader(64, SequenceOptions { batch_size: 16, ..Default::default() });
        let parallel = loader(
            64,
            SequenceOptions {
                batch_size: 16,
                num_workers: 4,
                ..Default::default()
            },
        );
        assert_eq!(traverse(&sequential), traverse(&parallel));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = SequenceLoader::<NdArray>::new(
            partition(3),
            Default::default(),
            SequenceOptions { batch_size: 0, ..Default::default() },
        );
        assert!(matches!(result, Err(DataError::InvalidConfig(_))));
    }

    #[test]
    fn test_into_iterator_for_loop() {
        let loader = loader(9, SequenceOptions { batch_size: 3, num_workers: 2, ..Default::default() });
        let mut seen = 0;
        for batch in &loader {
            assert_eq!(batch.images.dims(), [3, 784]);
            seen += batch.len();
        }
        assert_eq!(seen, 9);
    }
}
