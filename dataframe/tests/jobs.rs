use std::{
    collections::BTreeSet,
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use dataframe::{Context, DataFrame, EngineConfig, EngineErr, Partition, Row, TaskPanic, Value};

fn context(max_task_attempts: usize) -> Context {
    let config = EngineConfig {
        parallelism: NonZeroUsize::new(4),
        max_task_attempts: NonZeroUsize::new(max_task_attempts).unwrap(),
    };

    Context::new(config).unwrap()
}

fn frame(context: &Context, n: i64) -> DataFrame {
    let rows = (0..n).map(|i| Row::new([("id", Value::Int(i))])).collect();
    DataFrame::from_rows(context, rows)
}

fn ids(rows: impl IntoIterator<Item = Row>) -> BTreeSet<usize> {
    rows.into_iter()
        .filter_map(|r| r.get("id")?.as_index())
        .collect()
}

#[test]
fn repartitioning_twice_covers_the_full_dataset_each_time() {
    let context = context(1);
    let df = frame(&context, 100);
    let n = NonZeroUsize::new(7).unwrap();

    let first = df.repartition(n);
    let second = first.repartition(n);

    for df in [&first, &second] {
        assert_eq!(df.num_partitions(), 7);
        assert_eq!(df.count(), 100);
        assert_eq!(ids(df.collect()), (0..100).collect());
    }
}

#[test]
fn job_returns_one_output_per_partition() {
    let context = context(1);
    let df = frame(&context, 20).repartition(NonZeroUsize::new(5).unwrap());

    let sizes = df
        .run_job(|p: &Partition| Ok::<_, EngineErr>((p.id(), p.len())))
        .unwrap();

    assert_eq!(sizes, [(0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]);
}

#[test]
fn map_partitions_derives_a_field() {
    let context = context(1);
    let df = frame(&context, 10);

    let doubled = df
        .map_partitions(|p: &Partition| {
            p.rows()
                .iter()
                .map(|r| {
                    let id = r.get("id").and_then(Value::as_f64).ok_or("no id")?;
                    Ok(r.with_field("double", Value::Float(id * 2.)))
                })
                .collect::<Result<Vec<_>, &str>>()
        })
        .unwrap();

    assert_eq!(doubled.count(), 10);
    for row in doubled.rows() {
        let id = row.get("id").and_then(Value::as_f64).unwrap();
        assert_eq!(row.get("double"), Some(&Value::Float(id * 2.)));
    }
}

#[test]
fn failed_tasks_are_retried() {
    let context = context(3);
    let df = frame(&context, 8).repartition(NonZeroUsize::new(2).unwrap());
    let calls = AtomicUsize::new(0);

    // partition 1 fails on its first two attempts
    let out = df
        .run_job(|p: &Partition| {
            if p.id() == 1 && calls.fetch_add(1, Ordering::SeqCst) < 2 {
                return Err("flaky");
            }
            Ok(p.len())
        })
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(out, [4, 4]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn tasks_that_keep_failing_fail_the_job() {
    let context = context(2);
    let df = frame(&context, 8).repartition(NonZeroUsize::new(2).unwrap());
    let calls = AtomicUsize::new(0);

    let res = df.run_job(|p: &Partition| {
        calls.fetch_add(1, Ordering::SeqCst);
        if p.id() == 0 {
            return Err("always");
        }
        Ok(())
    });

    match res {
        Err(EngineErr::TaskFailed {
            partition,
            attempts,
            cause,
        }) => {
            assert_eq!(partition, 0);
            assert_eq!(attempts, 2);
            assert_eq!(cause.to_string(), "always");
        }
        other => panic!("unexpected result {other:?}"),
    }

    assert!(calls.load(Ordering::SeqCst) >= 2);
}

#[test]
fn panics_become_task_failures() {
    let context = context(1);
    let df = frame(&context, 4).repartition(NonZeroUsize::new(2).unwrap());

    let res = df.run_job(|p: &Partition| {
        if p.id() == 1 {
            panic!("boom");
        }
        Ok::<_, EngineErr>(())
    });

    let Err(EngineErr::TaskFailed { partition, cause, .. }) = res else {
        panic!("expected a task failure");
    };

    assert_eq!(partition, 1);
    let panic = cause.downcast_ref::<TaskPanic>().unwrap();
    assert_eq!(panic.message(), "boom");
}
