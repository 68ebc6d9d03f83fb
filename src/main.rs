use std::{env, fs, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use dataframe::{Context, io::read_json_lines};
use log::info;
use machine_learning::Network;

use ensemble::{EnsembleTrainer, JobConfig, LabelVectorTransformer, Trainer};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let [_, config_path, data_path, out_dir] = args.as_slice() else {
        bail!("usage: ensemble <config.json> <data.jsonl> <out_dir>");
    };

    let text = fs::read_to_string(config_path)
        .with_context(|| format!("reading config from {config_path}"))?;
    let mut job = JobConfig::from_json(&text)?;

    let context = Context::new(job.engine)?;
    let mut df = read_json_lines(&context, data_path)?;

    let network = Network::from_descriptor(
        machine_learning::ModelDescriptor {
            architecture: job.model.clone(),
            weights: None,
        },
        job.ensemble.seed,
    )?;

    if let Some(vectorize) = &job.vectorize {
        let transformer = LabelVectorTransformer::new(network.output_size())
            .with_input_col(vectorize.input_col.as_str())
            .with_output_col(vectorize.output_col.as_str())
            .with_policy(job.ensemble.on_malformed);

        let (vectorized, report) = transformer.transform_with_report(&df)?;
        info!(
            ingested = report.ingested,
            skipped = report.skipped_count();
            "labels vectorized"
        );

        df = vectorized;
        job.ensemble.label_col = vectorize.output_col.clone();
    }

    let trainer = EnsembleTrainer::new(&network, job.ensemble)?;
    let results = trainer.train(&df)?;

    let out_dir = PathBuf::from(out_dir);
    fs::create_dir_all(&out_dir)?;

    for result in &results {
        let model_path = out_dir.join(format!("model-{}.json", result.partition));
        let history_path = out_dir.join(format!("history-{}.json", result.partition));

        fs::write(&model_path, &result.model)?;
        fs::write(&history_path, serde_json::to_string_pretty(&result.history)?)?;

        info!("wrote {} and {}", model_path.display(), history_path.display());
    }

    let skipped: usize = results.iter().map(|r| r.ingest.skipped_count()).sum();
    info!(replicas = results.len(), skipped = skipped; "done");
    Ok(())
}
