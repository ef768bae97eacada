// End-to-end behaviour of DatasetSplitter over the synthetic provider.

use std::collections::HashSet;
use std::path::Path;

use burn::backend::NdArray;
use burn::data::dataset::Dataset;

use visionpod_data::data::provider::ProviderKind;
use visionpod_data::data::sequence::SequenceLoader;
use visionpod_data::infra::snapshot::SplitSnapshot;
use visionpod_data::{
    DataError, DatasetSplitter, PartitionKind, SplitPaths, SplitterConfig, SplitterState, Stage,
};

fn config(dir: &Path, train_len: usize, test_len: usize, train_size: f64) -> SplitterConfig {
    SplitterConfig {
        provider: ProviderKind::Synthetic { train_len, test_len },
        data_dir: dir.join("cache"),
        train_size,
        batch_size: 32,
        num_workers: 2,
        splits: SplitPaths::under(dir.join("splits")),
        ..Default::default()
    }
}

fn built(cfg: SplitterConfig, stage: Stage) -> DatasetSplitter {
    let mut splitter = DatasetSplitter::from_config(cfg).unwrap();
    splitter.ensure_local(stage).unwrap();
    splitter.build_splits(stage).unwrap();
    splitter
}

fn order(loader: &SequenceLoader<NdArray>) -> Vec<usize> {
    loader.iter().flat_map(|batch| batch.positions).collect()
}

#[test]
fn fit_split_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let a = built(config(dir.path(), 500, 100, 0.8), Stage::Fit);
    let b = built(config(dir.path(), 500, 100, 0.8), Stage::Fit);

    assert_eq!(a.train().unwrap().indices(), b.train().unwrap().indices());
    assert_eq!(a.val().unwrap().indices(), b.val().unwrap().indices());
}

#[test]
fn different_seed_gives_different_split() {
    let dir = tempfile::tempdir().unwrap();
    let a = built(config(dir.path(), 500, 100, 0.8), Stage::Fit);
    let mut cfg = config(dir.path(), 500, 100, 0.8);
    cfg.seed = 7;
    let b = built(cfg, Stage::Fit);

    assert_ne!(a.train().unwrap().indices(), b.train().unwrap().indices());
}

#[test]
fn train_and_val_cover_source_without_overlap() {
    let dir = tempfile::tempdir().unwrap();
    for &train_size in &[0.1, 0.5, 0.8, 0.95] {
        let s = built(config(dir.path(), 333, 10, train_size), Stage::Fit);
        let train: HashSet<usize> = s.train().unwrap().indices().iter().copied().collect();
        let val: HashSet<usize> = s.val().unwrap().indices().iter().copied().collect();

        assert_eq!(train.len() + val.len(), 333);
        assert!(train.is_disjoint(&val));
        assert_eq!(train.len(), (333.0 * train_size).floor() as usize);
    }
}

#[test]
fn test_partition_ignores_train_size() {
    let dir = tempfile::tempdir().unwrap();
    for &train_size in &[0.2, 0.8] {
        let s = built(config(dir.path(), 100, 37, train_size), Stage::Test);
        assert_eq!(s.test().unwrap().len(), 37);
    }
}

#[test]
fn thousand_samples_split_800_200_with_full_test() {
    let dir = tempfile::tempdir().unwrap();
    let s = built(config(dir.path(), 1000, 200, 0.8), Stage::All);

    assert_eq!(s.state(), SplitterState::Ready);
    assert_eq!(s.train().unwrap().len(), 800);
    assert_eq!(s.val().unwrap().len(), 200);
    assert_eq!(s.test().unwrap().len(), 200);
}

#[test]
fn train_sequence_reshuffles_every_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let s = built(config(dir.path(), 300, 50, 0.8), Stage::Fit);
    let loader = s.train_sequence::<NdArray>(&Default::default()).unwrap();

    let first = order(&loader);
    let second = order(&loader);
    assert_eq!(first.len(), 240);
    assert_ne!(first, second);

    let a: HashSet<usize> = first.into_iter().collect();
    let b: HashSet<usize> = second.into_iter().collect();
    assert_eq!(a, b);
}

#[test]
fn val_and_test_sequences_keep_order() {
    let dir = tempfile::tempdir().unwrap();
    let s = built(config(dir.path(), 300, 50, 0.8), Stage::All);
    let device = Default::default();

    let val = s.val_sequence::<NdArray>(&device).unwrap();
    assert_eq!(order(&val), order(&val));
    assert_eq!(order(&val), s.val().unwrap().indices());

    let test = s.test_sequence::<NdArray>(&device).unwrap();
    assert_eq!(order(&test), order(&test));
    assert_eq!(order(&test), (0..50).collect::<Vec<_>>());
}

#[test]
fn sequences_batch_by_batch_size() {
    let dir = tempfile::tempdir().unwrap();
    let s = built(config(dir.path(), 100, 10, 0.8), Stage::Fit);
    let loader = s.val_sequence::<NdArray>(&Default::default()).unwrap();

    let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![20]);

    let loader = s.train_sequence::<NdArray>(&Default::default()).unwrap();
    let sizes: Vec<usize> = loader.iter().map(|b| b.len()).collect();
    assert_eq!(sizes, vec![32, 32, 16]);
}

#[test]
fn persist_builds_missing_test_partition() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 120, 45, 0.75);
    let mut s = built(cfg.clone(), Stage::Fit);
    assert_eq!(s.state(), SplitterState::TrainValReady);

    s.persist_splits().unwrap();

    let snapshot = SplitSnapshot::load(&cfg.splits.test).unwrap();
    assert_eq!(snapshot.partition, PartitionKind::Test);
    assert_eq!(snapshot.indices, (0..45).collect::<Vec<_>>());

    let provider = cfg.provider.build();
    let restored = snapshot.restore(provider.as_ref()).unwrap();
    assert_eq!(restored.len(), 45);
}

#[test]
fn persisted_train_and_val_restore_to_same_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path(), 80, 20, 0.8);
    let mut s = built(cfg.clone(), Stage::All);
    s.persist_splits().unwrap();

    let provider = cfg.provider.build();
    for kind in [PartitionKind::Train, PartitionKind::Val] {
        let restored = SplitSnapshot::load(cfg.splits.get(kind))
            .unwrap()
            .restore(provider.as_ref())
            .unwrap();
        let original = s.partition(kind).unwrap();
        assert_eq!(restored.indices(), original.indices());
        assert_eq!(restored.raw().transform(), original.raw().transform());
    }
}

#[test]
fn test_sequence_does_not_build_missing_partition() {
    let dir = tempfile::tempdir().unwrap();
    let s = built(config(dir.path(), 50, 10, 0.8), Stage::Fit);

    let result = s.test_sequence::<NdArray>(&Default::default());
    assert!(matches!(result, Err(DataError::MissingPartition(PartitionKind::Test))));
    assert_eq!(s.state(), SplitterState::TrainValReady);
}

#[test]
fn persist_before_fit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = DatasetSplitter::from_config(config(dir.path(), 50, 10, 0.8)).unwrap();
    s.ensure_local(Stage::All).unwrap();

    let err = s.persist_splits().unwrap_err();
    assert!(matches!(err, DataError::MissingPartition(PartitionKind::Train)));
    assert_eq!(s.state(), SplitterState::DataPresent);
}

#[test]
fn rebuilding_never_drops_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = built(config(dir.path(), 60, 15, 0.5), Stage::All);
    let train_before = s.train().unwrap().indices().to_vec();

    s.build_splits(Stage::Test).unwrap();
    assert_eq!(s.state(), SplitterState::Ready);
    assert_eq!(s.train().unwrap().indices(), train_before.as_slice());
}
