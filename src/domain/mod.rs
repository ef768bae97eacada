// ============================================================
// Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   sample.rs  — ImageItem, one labeled image
//   stage.rs   — Stage (fit / test / all), SourcePartition
//                (train- or test-flagged raw data), PartitionKind
//                (train / val / test subsets)
//   traits.rs  — the Transform abstraction applied per sample
//
// Rules for this layer:
//   - NO burn framework types
//   - NO file I/O or network calls

/// A single labeled image sample
pub mod sample;

/// Pipeline stages and partition identifiers
pub mod stage;

/// Core abstractions implemented by the data layer
pub mod traits;
