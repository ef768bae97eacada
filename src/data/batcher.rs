// ============================================================
// Data — Image Batcher
// ============================================================
// Implements Burn's Batcher trait to stack ImageItems into
// tensors the model consumer can feed straight into a
// forward pass.
//
// How batching works here:
//   Input:  Vec of N ImageItems, each with C*H*W pixel values
//   Output: ImageBatch with
//             images  [N, C*H*W]  float
//             targets [N]         int
//
// Every item in a partition has the same shape, so the pixel
// vectors are concatenated and reshaped in one go.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Int, Tensor, TensorData},
};

use crate::domain::sample::ImageItem;

// ─── ImageBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    /// Flattened images, shape [batch_size, C*H*W]
    pub images: Tensor<B, 2>,

    /// Class labels, shape [batch_size]
    pub targets: Tensor<B, 1, Int>,

    /// Raw-source position of each row, in row order
    pub positions: Vec<usize>,

    /// Labels of each row, in row order
    pub labels: Vec<usize>,
}

impl<B: Backend> ImageBatch<B> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ─── ImageBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created where the consumer runs.
#[derive(Clone, Debug)]
pub struct ImageBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ImageBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        let batch_size = items.len();
        let width = items.first().map(ImageItem::num_values).unwrap_or(0);

        let mut pixels: Vec<f32> = Vec::with_capacity(batch_size * width);
        let mut labels: Vec<i64> = Vec::with_capacity(batch_size);
        let mut positions = Vec::with_capacity(batch_size);
        let mut class_ids = Vec::with_capacity(batch_size);

        for item in items {
            pixels.extend_from_slice(&item.pixels);
            labels.push(item.label as i64);
            positions.push(item.index);
            class_ids.push(item.label);
        }

        let images = Tensor::<B, 2>::from_data(
            TensorData::new(pixels, [batch_size, width]),
            &self.device,
        );
        let targets = Tensor::<B, 1, Int>::from_data(
            TensorData::new(labels, [batch_size]),
            &self.device,
        );

        ImageBatch {
            images,
            targets,
            positions,
            labels: class_ids,
        }
    }
}
