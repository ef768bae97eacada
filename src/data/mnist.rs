// ============================================================
// Data — MNIST / Fashion-MNIST Provider
// ============================================================
// Both datasets ship as four IDX files:
//
//   train-images-idx3-ubyte  (60,000 28×28 images)
//   train-labels-idx1-ubyte  (60,000 labels 0-9)
//   t10k-images-idx3-ubyte   (10,000 28×28 images)
//   t10k-labels-idx1-ubyte   (10,000 labels 0-9)
//
// Files are kept uncompressed under <root>/<folder>/raw/ and
// fetched as `<mirror><file>.gz` when missing.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use burn::data::dataset::InMemDataset;

use crate::data::{
    idx,
    provider::{DatasetProvider, SourceHandle},
};
use crate::domain::{sample::ImageItem, stage::SourcePartition};
use crate::error::{DataError, Result};
use crate::infra::download;

const DIGITS_MIRROR: &str = "https://ossci-datasets.s3.amazonaws.com/mnist/";
const FASHION_MIRROR: &str = "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MnistVariant {
    Digits,
    Fashion,
}

#[derive(Debug, Clone)]
pub struct MnistProvider {
    variant: MnistVariant,
    mirror: String,
}

impl MnistProvider {
    pub fn digits() -> Self {
        Self {
            variant: MnistVariant::Digits,
            mirror: DIGITS_MIRROR.to_string(),
        }
    }

    pub fn fashion() -> Self {
        Self {
            variant: MnistVariant::Fashion,
            mirror: FASHION_MIRROR.to_string(),
        }
    }

    /// Fetch from another base URL. A trailing slash is added when missing.
    pub fn with_mirror(mut self, mirror: impl Into<String>) -> Self {
        let mut mirror = mirror.into();
        if !mirror.ends_with('/') {
            mirror.push('/');
        }
        self.mirror = mirror;
        self
    }

    /// Directory holding the uncompressed IDX files.
    pub fn raw_dir(&self, root: &Path) -> PathBuf {
        let folder = match self.variant {
            MnistVariant::Digits => "MNIST",
            MnistVariant::Fashion => "FashionMNIST",
        };
        root.join(folder).join("raw")
    }

    fn file_names(partition: SourcePartition) -> [&'static str; 2] {
        match partition {
            SourcePartition::Train => ["train-images-idx3-ubyte", "train-labels-idx1-ubyte"],
            SourcePartition::Test => ["t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte"],
        }
    }

    fn read(path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(DataError::MissingFile(path.to_path_buf()));
        }
        Ok(fs::read(path)?)
    }
}

impl DatasetProvider for MnistProvider {
    fn name(&self) -> &str {
        match self.variant {
            MnistVariant::Digits => "mnist",
            MnistVariant::Fashion => "fashion-mnist",
        }
    }

    fn is_local(&self, root: &Path, partition: SourcePartition) -> bool {
        let dir = self.raw_dir(root);
        Self::file_names(partition)
            .iter()
            .all(|name| dir.join(name).is_file())
    }

    fn download(&self, root: &Path, partition: SourcePartition) -> Result<()> {
        let dir = self.raw_dir(root);
        let client = download::http_client()?;

        for name in Self::file_names(partition) {
            let dest = dir.join(name);
            if dest.is_file() {
                continue;
            }
            let url = format!("{}{}.gz", self.mirror, name);
            download::fetch_gzipped(&client, &url, &dest)?;
        }
        Ok(())
    }

    fn load(&self, root: &Path, partition: SourcePartition) -> Result<SourceHandle> {
        let dir = self.raw_dir(root);
        let [images_name, labels_name] = Self::file_names(partition);

        let images = idx::parse_images(&Self::read(&dir.join(images_name))?)?;
        let labels = idx::parse_labels(&Self::read(&dir.join(labels_name))?)?;

        if images.count() != labels.len() {
            return Err(DataError::CountMismatch {
                images: images.count(),
                labels: labels.len(),
            });
        }

        let items = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| {
                let bytes = images
                    .image(i)
                    .ok_or_else(|| DataError::InvalidFormat(format!("image {i} out of range")))?;
                let pixels = bytes.iter().map(|&p| p as f32).collect();
                Ok(ImageItem::grayscale(i, pixels, images.rows, images.cols, label as usize))
            })
            .collect::<Result<Vec<ImageItem>>>()?;

        tracing::debug!(
            "Loaded {} {} samples ({}x{}) from '{}'",
            items.len(),
            partition,
            images.rows,
            images.cols,
            dir.display()
        );

        Ok(Arc::new(InMemDataset::new(items)))
    }
}
