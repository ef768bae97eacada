use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::provider::{DatasetProvider, SourceHandle};
use crate::data::transform::TransformPipeline;
use crate::domain::{sample::ImageItem, stage::SourcePartition, traits::Transform};
use crate::error::Result;

/// Where a raw source came from; enough to reopen it later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub provider: String,
    pub root: PathBuf,
    pub partition: SourcePartition,
}

/// A provider's train- or test-flagged data with a transform applied on access.
///
/// Cloning and `with_transform` share the loaded samples.
#[derive(Clone)]
pub struct RawDataset {
    source: SourceHandle,
    origin: SourceRef,
    transform: Arc<TransformPipeline>,
}

impl RawDataset {
    /// Open `partition` of `provider` under `root`, fetching it first when
    /// `download` is set and the files are missing.
    pub fn open(
        provider: &dyn DatasetProvider,
        root: &Path,
        partition: SourcePartition,
        download: bool,
        transform: TransformPipeline,
    ) -> Result<Self> {
        if download {
            provider.ensure_local(root, partition)?;
        }
        let source = provider.load(root, partition)?;

        Ok(Self {
            source,
            origin: SourceRef {
                provider: provider.name().to_string(),
                root: root.to_path_buf(),
                partition,
            },
            transform: Arc::new(transform),
        })
    }

    /// Same samples, different transform.
    pub fn with_transform(&self, transform: TransformPipeline) -> Self {
        Self {
            source: self.source.clone(),
            origin: self.origin.clone(),
            transform: Arc::new(transform),
        }
    }

    pub fn origin(&self) -> &SourceRef {
        &self.origin
    }

    pub fn transform(&self) -> &TransformPipeline {
        &self.transform
    }

    /// Whether two datasets read the same loaded samples.
    pub fn shares_source_with(&self, other: &RawDataset) -> bool {
        Arc::ptr_eq(&self.source, &other.source)
    }
}

impl Dataset<ImageItem> for RawDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        self.source.get(index).map(|item| self.transform.apply(item))
    }

    fn len(&self) -> usize {
        self.source.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{synthetic::SyntheticProvider, transform::TransformStep};

    fn open(transform: TransformPipeline) -> RawDataset {
        RawDataset::open(
            &SyntheticProvider::new(10, 5),
            Path::new("data/cache"),
            SourcePartition::Train,
            true,
            transform,
        )
        .unwrap()
    }

    #[test]
    fn test_transform_applied_on_get() {
        let raw = open(TransformPipeline::new(vec![TransformStep::Scale { factor: 0.5 }]));
        let expected = SyntheticProvider::sample(SourcePartition::Train, 4);
        let item = raw.get(4).unwrap();
        assert_eq!(item.pixels[1], expected.pixels[1] * 0.5);
        assert_eq!(item.index, 4);
        assert!(raw.get(10).is_none());
    }

    #[test]
    fn test_with_transform_shares_samples() {
        let raw = open(TransformPipeline::identity());
        let scaled = raw.with_transform(TransformPipeline::eval_default());
        assert!(raw.shares_source_with(&scaled));
        assert_eq!(scaled.len(), raw.len());
        assert_eq!(scaled.origin(), raw.origin());
        assert_ne!(scaled.get(2), raw.get(2));
    }

    #[test]
    fn test_origin_records_provider() {
        let raw = open(TransformPipeline::identity());
        assert_eq!(raw.origin().provider, "synthetic");
        assert_eq!(raw.origin().partition, SourcePartition::Train);
        assert_eq!(raw.origin().root, PathBuf::from("data/cache"));
    }
}
