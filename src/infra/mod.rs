// ============================================================
// Infrastructure Layer
// ============================================================
// Cross-cutting I/O used by the data and application layers:
//
//   download.rs     — HTTP fetch + gunzip of remote dataset files
//                     (reqwest blocking client, flate2)
//
//   snapshot.rs     — JSON snapshots of train/val/test partitions:
//                     source reference, transform and indices,
//                     never the samples themselves
//
//   config_store.rs — SplitterConfig load/save as JSON
//
// Reference: Rust Book §9 (Error Handling)

/// Remote dataset file fetching
pub mod download;

/// Partition snapshot persistence and restore
pub mod snapshot;

/// Splitter configuration files
pub mod config_store;
