use std::num::NonZeroUsize;

use dataframe::{Context, DataFrame, EngineConfig, Row, Value};
use ensemble::{
    EnsembleConfig, EnsembleErr, EnsembleTrainer, InitialWeights, LabelVectorTransformer,
    MalformedPolicy, Trainer, Transformer,
};
use machine_learning::{
    Network,
    specs::{ActFnSpec, InitSpec, LayerSpec, ModelSpec},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn context() -> Context {
    let config = EngineConfig {
        parallelism: NonZeroUsize::new(4),
        ..Default::default()
    };

    Context::new(config).unwrap()
}

fn network() -> Network {
    let spec = ModelSpec::Sequential {
        layers: vec![
            LayerSpec::Dense {
                dim: (4, 8),
                act_fn: Some(ActFnSpec::Relu),
                init: InitSpec::Kaiming,
            },
            LayerSpec::Dense {
                dim: (8, 3),
                act_fn: None,
                init: InitSpec::XavierUniform,
            },
            LayerSpec::Softmax { dim: 3 },
        ],
    };

    Network::new(spec, &mut StdRng::seed_from_u64(0)).unwrap()
}

/// Three noisy clusters, one per class.
fn records(n: usize) -> Vec<Row> {
    let mut rng = StdRng::seed_from_u64(1);

    (0..n)
        .map(|i| {
            let class = i % 3;
            let features = (0..4)
                .map(|j| (if j == class { 1.0 } else { 0.0 }) + rng.random_range(-0.1..0.1))
                .collect();

            Row::new([
                ("id", Value::Int(i as i64)),
                ("features", Value::Vector(features)),
                ("label", Value::Int(class as i64)),
            ])
        })
        .collect()
}

fn config(num_models: usize) -> EnsembleConfig {
    EnsembleConfig {
        seed: Some(5),
        ..EnsembleConfig::new(NonZeroUsize::new(num_models).unwrap())
    }
}

#[test]
fn four_replicas_over_a_hundred_records() {
    let df = DataFrame::from_rows(&context(), records(100));
    let trainer = EnsembleTrainer::new(&network(), config(4)).unwrap();

    let results = trainer.train(&df).unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results.iter().map(|r| r.ingest.ingested).sum::<usize>(), 100);
    assert!(results.iter().all(|r| r.ingest.skipped.is_empty()));

    let mut partitions: Vec<_> = results.iter().map(|r| r.partition).collect();
    partitions.sort();
    assert_eq!(partitions, [0, 1, 2, 3]);
}

#[test]
fn every_result_decodes_into_a_network() {
    let df = DataFrame::from_rows(&context(), records(30));
    let initial = network();
    let trainer = EnsembleTrainer::new(&initial, config(3)).unwrap();

    for result in trainer.train(&df).unwrap() {
        let mut decoded = result.decode().unwrap();

        assert_eq!(decoded.spec(), initial.spec());
        assert_eq!(decoded.params().len(), initial.params().len());

        let x = ndarray::Array2::<f32>::zeros((1, 4));
        assert_eq!(decoded.predict(x.view()).unwrap().dim(), (1, 3));
        assert_eq!(result.history.epochs.len(), 1);
        assert!(result.history.epochs[0].metrics.contains_key("accuracy"));
    }
}

#[test]
fn replicas_are_trained_independently() {
    let df = DataFrame::from_rows(&context(), records(40));
    let initial = network();
    let config = EnsembleConfig {
        initial_weights: InitialWeights::Shared,
        ..config(2)
    };
    let trainer = EnsembleTrainer::new(&initial, config).unwrap();

    let results = trainer.train(&df).unwrap();
    let a = results[0].decode().unwrap();
    let b = results[1].decode().unwrap();

    assert_ne!(a.params(), initial.params());
    assert_ne!(a.params(), b.params());
}

#[test]
fn a_missing_label_is_an_explicit_error() {
    let mut rows = records(20);
    rows[7] = Row::new([("features", Value::Vector(vec![0.; 4]))]);
    let df = DataFrame::from_rows(&context(), rows);
    let trainer = EnsembleTrainer::new(&network(), config(2)).unwrap();

    let err = trainer.train(&df).unwrap_err();

    match err.root() {
        EnsembleErr::MalformedRecord { reason, .. } => assert!(reason.contains("label")),
        other => panic!("unexpected error {other}"),
    }
    assert!(matches!(err, EnsembleErr::TaskFailed { attempts: 1, .. }));
}

#[test]
fn skipped_records_are_reported() {
    let mut rows = records(20);
    rows[7] = Row::new([("features", Value::Vector(vec![0.; 4]))]);
    let df = DataFrame::from_rows(&context(), rows);
    let config = EnsembleConfig {
        on_malformed: MalformedPolicy::Skip,
        ..config(2)
    };
    let trainer = EnsembleTrainer::new(&network(), config).unwrap();

    let results = trainer.train(&df).unwrap();

    assert_eq!(results.iter().map(|r| r.ingest.ingested).sum::<usize>(), 19);
    let skipped: Vec<_> = results.iter().flat_map(|r| &r.ingest.skipped).collect();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].reason.contains("missing field \"label\""));
}

#[test]
fn empty_datasets_are_rejected_before_dispatch() {
    let df = DataFrame::from_rows(&context(), vec![]);
    let trainer = EnsembleTrainer::new(&network(), config(2)).unwrap();

    assert!(matches!(trainer.train(&df), Err(EnsembleErr::EmptyDataset)));
}

#[test]
fn fewer_records_than_replicas_is_a_config_error() {
    let df = DataFrame::from_rows(&context(), records(3));
    let trainer = EnsembleTrainer::new(&network(), config(4)).unwrap();

    assert!(matches!(
        trainer.train(&df),
        Err(EnsembleErr::InvalidConfig(_))
    ));
}

#[test]
fn vectorized_labels_feed_the_ensemble() {
    let df = DataFrame::from_rows(&context(), records(24));
    let vectorized = LabelVectorTransformer::new(3).transform(&df).unwrap();

    let config = EnsembleConfig {
        label_col: "label_vectorized".into(),
        ..config(2)
    };
    let trainer = EnsembleTrainer::new(&network(), config).unwrap();

    let results = trainer.train(&vectorized).unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn invalid_descriptors_are_rejected_up_front() {
    let res = EnsembleTrainer::from_descriptor("{}", config(2));
    assert!(matches!(res, Err(EnsembleErr::Descriptor(_))));
}
