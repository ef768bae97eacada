// ============================================================
// Domain — ImageItem
// ============================================================
// One labeled image as handed out by a dataset provider.
//
// Pixels are stored channel-first ([C, H, W]) and flattened,
// so a 28×28 grayscale digit is 784 values. `index` is the
// position of the sample inside its raw source and survives
// every transform; batches report it so callers can audit
// which samples they received and in which order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    /// Position of this sample in its raw source
    pub index: usize,

    /// Flattened [C, H, W] pixel values
    pub pixels: Vec<f32>,

    pub channels: usize,
    pub height: usize,
    pub width: usize,

    /// Class label
    pub label: usize,
}

impl ImageItem {
    /// Build a single-channel image from row-major pixels.
    pub fn grayscale(index: usize, pixels: Vec<f32>, height: usize, width: usize, label: usize) -> Self {
        Self {
            index,
            pixels,
            channels: 1,
            height,
            width,
            label,
        }
    }

    /// Number of values per image (C * H * W)
    pub fn num_values(&self) -> usize {
        self.channels * self.height * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_dimensions() {
        let item = ImageItem::grayscale(3, vec![0.0; 12], 3, 4, 7);
        assert_eq!(item.channels, 1);
        assert_eq!(item.num_values(), 12);
        assert_eq!(item.num_values(), item.pixels.len());
        assert_eq!(item.label, 7);
    }
}
