//! Command implementations for the CareerLens CLI.

use std::io;

use tracing::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::ServiceConfig;
use crate::dataset::{DatasetFetcher, SchemaNormalizer, Table, write_training_csv};
use crate::error::{CareerLensError, Result};
use crate::pipeline::inference::InferenceService;
use crate::pipeline::trainer::Trainer;
use crate::service::{http, line};

/// Execute a CLI command.
pub fn execute_command(args: CareerLensArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args),
        Command::Serve(serve_args) => serve(serve_args),
        Command::Prepare(prepare_args) => prepare(prepare_args, &args),
        Command::Download(download_args) => download(download_args, &args),
    }
}

/// Train and persist the three artifacts.
fn train(args: &TrainArgs, cli_args: &CareerLensArgs) -> Result<()> {
    let config = args.training_config()?;
    let paths = args.artifact_paths();
    if cli_args.verbosity() > 1 {
        eprintln!("Training {:?} model on {}", config.model, args.dataset.display());
    }

    let trainer = Trainer::new(config)?;
    let report = trainer.run(
        &args.dataset,
        args.text_columns.as_deref(),
        args.label_column.as_deref(),
        &paths,
    )?;

    if cli_args.verbosity() > 0 {
        eprintln!(
            "Validation accuracy: {}",
            format_accuracy(report.validation_accuracy)
        );
    }
    output_result("Model trained successfully", &report, cli_args)
}

/// Line mode: a single `--input` request, or every stdin line until EOF.
fn predict(args: &PredictArgs) -> Result<()> {
    let service = load_service(args.models_dir.as_ref())?;
    let stdout = io::stdout();

    match &args.input {
        Some(input) => line::run_single(&service, input, stdout.lock(), args.top_k),
        None => {
            let summary = line::run_lines(&service, io::stdin().lock(), stdout.lock(), args.top_k)?;
            info!(answered = summary.answered, failed = summary.failed, "done");
            Ok(())
        }
    }
}

/// Run the HTTP service until interrupted.
fn serve(args: &ServeArgs) -> Result<()> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = &args.models_dir {
        config.base_dir = dir.clone();
    }
    let service = InferenceService::load(&config.artifact_paths())?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(http::serve(&config, service, args.top_k))
        .map_err(|e| CareerLensError::other(format!("server failed: {e:#}")))
}

/// Normalize a CSV into `text,label` rows.
fn prepare(args: &PrepareArgs, cli_args: &CareerLensArgs) -> Result<()> {
    let table = Table::from_csv_path(&args.input)?;
    let normalizer = SchemaNormalizer::new();
    let selection = normalizer.select_columns(
        &table,
        args.text_columns.as_deref(),
        args.label_column.as_deref(),
    )?;
    let rows = normalizer.build_rows(&table, &selection);
    if rows.is_empty() {
        return Err(CareerLensError::schema(format!(
            "no usable rows after normalization; columns: {}",
            table.describe_columns()
        )));
    }
    write_training_csv(&rows, &args.output)?;

    output_result(
        "Dataset prepared successfully",
        &PreparationResult {
            input: args.input.display().to_string(),
            output: args.output.display().to_string(),
            rows: rows.len(),
            preset: selection.preset.clone(),
            text_columns: selection.text_columns.clone(),
            label_column: selection.label_column.clone(),
        },
        cli_args,
    )
}

/// Fetch a dataset and copy its first CSV to the output path.
fn download(args: &DownloadArgs, cli_args: &CareerLensArgs) -> Result<()> {
    let fetcher = DatasetFetcher::new(args.program.clone());
    let path = fetcher.fetch(
        &args.dataset,
        args.file.as_deref(),
        &args.download_dir(),
        &args.output,
    )?;

    output_result(
        "Dataset downloaded successfully",
        &DownloadResult {
            dataset: args.dataset.clone(),
            path: path.display().to_string(),
        },
        cli_args,
    )
}

fn load_service(models_dir: Option<&std::path::PathBuf>) -> Result<InferenceService> {
    let mut config = ServiceConfig::from_env()?;
    if let Some(dir) = models_dir {
        config.base_dir = dir.clone();
    }
    InferenceService::load(&config.artifact_paths())
}
