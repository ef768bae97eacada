#![recursion_limit = "256"]

//! Deterministic train/val/test splitting for labeled image datasets.
//!
//! The crate is layered the same way the binary uses it:
//!
//!   cli          → argument parsing, dispatch
//!   application  → prepare / split / inspect workflows
//!   domain       → plain types (samples, stages, transforms)
//!   data         → providers, partitions, splitter, batched sequences
//!   infra        → downloads, split snapshots, config files

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;

pub use data::splitter::{DatasetSplitter, SplitPaths, SplitterConfig, SplitterState};
pub use domain::stage::{PartitionKind, SourcePartition, Stage};
pub use error::{DataError, Result};
