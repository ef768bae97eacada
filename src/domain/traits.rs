// ============================================================
// Domain — Core Traits
// ============================================================
// Transform is the per-sample function a raw dataset applies
// at access time. Implementations are shared read-only across
// loader workers, so they must be Send + Sync and must not
// keep mutable state between calls.
//
// Implementations:
//   - TransformStep     → one scale/standardize/flip/noise/clamp op
//   - TransformPipeline → an ordered list of steps

use crate::domain::sample::ImageItem;

pub trait Transform: Send + Sync {
    /// Apply the transform, returning the modified sample.
    fn apply(&self, item: ImageItem) -> ImageItem;
}
