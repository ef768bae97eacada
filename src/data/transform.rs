// ============================================================
// Data — Per-sample Transforms
// ============================================================
// Transforms are described as data (TransformStep) rather than
// closures so a persisted split snapshot can record exactly
// which transform its partition applies, and a restored split
// behaves the same way.
//
// All augmentations treat `pixels` as [C, H, W], channel-first.

use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::{sample::ImageItem, traits::Transform};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformStep {
    /// Multiply every pixel by `factor` (1/255 maps bytes to [0, 1])
    Scale { factor: f32 },

    /// (x - mean) / std
    Standardize { mean: f32, std: f32 },

    /// Mirror the image left-to-right with probability `p`
    HorizontalFlip { p: f64 },

    /// Add zero-mean gaussian noise
    GaussianNoise { std: f32 },

    Clamp { min: f32, max: f32 },
}

impl Transform for TransformStep {
    fn apply(&self, mut item: ImageItem) -> ImageItem {
        match *self {
            TransformStep::Scale { factor } => {
                item.pixels.iter_mut().for_each(|v| *v *= factor);
            }
            TransformStep::Standardize { mean, std } => {
                item.pixels.iter_mut().for_each(|v| *v = (*v - mean) / std);
            }
            TransformStep::HorizontalFlip { p } => {
                if thread_rng().gen::<f64>() < p {
                    item = flip_horizontal(item);
                }
            }
            TransformStep::GaussianNoise { std } => {
                let mut rng = thread_rng();
                item.pixels
                    .iter_mut()
                    .for_each(|v| *v += std * standard_normal(&mut rng));
            }
            TransformStep::Clamp { min, max } => {
                item.pixels.iter_mut().for_each(|v| *v = (*v).clamp(min, max));
            }
        }
        item
    }
}

fn flip_horizontal(mut item: ImageItem) -> ImageItem {
    let (c, h, w) = (item.channels, item.height, item.width);
    if item.pixels.len() != c * h * w {
        tracing::warn!(
            "Skipping flip on sample {}: {} values for shape [{c}, {h}, {w}]",
            item.index,
            item.pixels.len()
        );
        return item;
    }
    for row in item.pixels.chunks_exact_mut(w.max(1)) {
        row.reverse();
    }
    item
}

/// Box-Muller draw from N(0, 1).
fn standard_normal<R: Rng>(rng: &mut R) -> f32 {
    let u1: f32 = rng.gen::<f32>().max(f32::MIN_POSITIVE);
    let u2: f32 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos()
}

// ─── TransformPipeline ───────────────────────────────────────────────────────
/// Ordered list of steps; the empty pipeline is the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformPipeline {
    steps: Vec<TransformStep>,
}

impl TransformPipeline {
    pub fn new(steps: Vec<TransformStep>) -> Self {
        Self { steps }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Default evaluation transform: bytes → [0, 1].
    pub fn eval_default() -> Self {
        Self::new(vec![TransformStep::Scale { factor: 1.0 / 255.0 }])
    }

    /// Default training transform: the evaluation transform plus light noise.
    pub fn train_default() -> Self {
        Self::new(vec![
            TransformStep::Scale { factor: 1.0 / 255.0 },
            TransformStep::GaussianNoise { std: 0.01 },
            TransformStep::Clamp { min: 0.0, max: 1.0 },
        ])
    }
}

impl Transform for TransformPipeline {
    fn apply(&self, item: ImageItem) -> ImageItem {
        self.steps.iter().fold(item, |item, step| step.apply(item))
    }
}
