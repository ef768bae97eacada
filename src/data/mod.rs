// ============================================================
// Data Pipeline
// ============================================================
// Everything between raw dataset files and tensor batches.
//
// The pipeline flows in this order:
//
//   remote mirror / in-memory generator
//       │
//       ▼
//   DatasetProvider   → fetches and opens train/test raw data
//       │
//       ▼
//   RawDataset        → loaded samples + per-sample transform
//       │
//       ▼
//   DatasetSplitter   → seeded train / val cut, full test set
//       │
//       ▼
//   Partition         → index view over a RawDataset
//       │
//       ▼
//   SequenceLoader    → shuffled or ordered traversal,
//       │               worker-parallel fetch
//       ▼
//   ImageBatcher      → stacks samples into tensor batches
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// IDX binary format used by MNIST-style datasets
pub mod idx;

/// The provider abstraction and the config-level selector
pub mod provider;

/// MNIST and Fashion-MNIST from IDX files
pub mod mnist;

/// Deterministic in-memory images
pub mod synthetic;

/// Per-sample transforms and pipelines
pub mod transform;

/// Raw sources with a transform applied on access
pub mod dataset;

/// Seeded split plans and partition views
pub mod partition;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Batched, optionally shuffled traversal of a partition
pub mod sequence;

/// Builds, persists and serves the train/val/test partitions
pub mod splitter;
