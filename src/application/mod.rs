// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data and infra layers to accomplish one
// goal per use case.
//
// Rules for this layer:
//   - No splitting or tensor logic here (that's data)
//   - No printing here (that's the CLI)
//   - Only workflow coordination and error context
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Download, split and persist
pub mod split_use_case;

// Restore persisted splits and check them
pub mod inspect_use_case;
