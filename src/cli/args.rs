//! Command line argument parsing for the CareerLens CLI using clap.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{ModelKind, TrainingConfig};
use crate::error::Result;
use crate::pipeline::artifact::{
    ArtifactPaths, LABEL_ENCODER_FILE, MODEL_FILE, VECTORIZER_FILE,
};
use crate::pipeline::inference::DEFAULT_TOP_K;

/// CareerLens - career-label classification from free-text profiles
#[derive(Parser, Debug, Clone)]
#[command(name = "careerlens")]
#[command(about = "Train and serve a career-label classifier for free-text profiles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CareerLensArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format for command reports
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CareerLensArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a classifier on a CSV dataset and write its artifacts
    Train(TrainArgs),

    /// Answer JSON prediction requests, one per line on stdin
    Predict(PredictArgs),

    /// Run the HTTP prediction service
    Serve(ServeArgs),

    /// Normalize a CSV into a two-column text,label dataset
    Prepare(PrepareArgs),

    /// Download a dataset with the kaggle CLI and keep its first CSV
    Download(DownloadArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the training CSV
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Columns combined into the text (comma-separated; default: auto-detect)
    #[arg(long, value_delimiter = ',')]
    pub text_columns: Option<Vec<String>>,

    /// Label column (default: auto-detect)
    #[arg(long)]
    pub label_column: Option<String>,

    /// Directory receiving the three artifacts
    #[arg(short, long, default_value = "models")]
    pub output_dir: PathBuf,

    /// Override the classifier artifact path
    #[arg(long)]
    pub model_out: Option<PathBuf>,

    /// Override the vectorizer artifact path
    #[arg(long)]
    pub vectorizer_out: Option<PathBuf>,

    /// Override the label encoder artifact path
    #[arg(long)]
    pub label_encoder_out: Option<PathBuf>,

    /// Training configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Classifier to train
    #[arg(short, long)]
    pub model: Option<ModelKind>,

    /// Vocabulary size cap
    #[arg(long)]
    pub max_features: Option<usize>,

    /// Fraction of rows held out for validation accuracy
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the train/holdout shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum optimizer iterations
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Inverse regularization strength
    #[arg(long)]
    pub c: Option<f64>,
}

impl TrainArgs {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::from_json_file(path)?,
            None => TrainingConfig::default(),
        };
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(max_features) = self.max_features {
            config.max_features = Some(max_features);
        }
        if let Some(test_size) = self.test_size {
            config.test_size = test_size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(max_iter) = self.max_iter {
            config.max_iter = max_iter;
        }
        if let Some(c) = self.c {
            config.c = c;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        let pick = |explicit: &Option<PathBuf>, file: &str| {
            explicit
                .clone()
                .unwrap_or_else(|| self.output_dir.join(file))
        };
        ArtifactPaths {
            model: pick(&self.model_out, MODEL_FILE),
            vectorizer: pick(&self.vectorizer_out, VECTORIZER_FILE),
            label_encoder: pick(&self.label_encoder_out, LABEL_ENCODER_FILE),
        }
    }
}

/// Arguments for line-mode prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Answer this single JSON request instead of reading stdin
    #[arg(short, long, value_name = "JSON")]
    pub input: Option<String>,

    /// Base directory holding the artifacts (default: ML_MODELS_DIR or cwd)
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Number of ranked labels per text
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

/// Arguments for the HTTP service
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Listen host (default: ML_HOST or 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Listen port (default: ML_PORT or 5000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Base directory holding the artifacts (default: ML_MODELS_DIR or cwd)
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Number of ranked labels per text
    #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

/// Arguments for dataset preparation
#[derive(Parser, Debug, Clone)]
pub struct PrepareArgs {
    /// Source CSV
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Destination text,label CSV
    #[arg(short, long, default_value = "dataset.csv")]
    pub output: PathBuf,

    /// Columns combined into the text (comma-separated; default: auto-detect)
    #[arg(long, value_delimiter = ',')]
    pub text_columns: Option<Vec<String>>,

    /// Label column (default: auto-detect)
    #[arg(long)]
    pub label_column: Option<String>,
}

/// Arguments for dataset download
#[derive(Parser, Debug, Clone)]
pub struct DownloadArgs {
    /// Dataset identifier (owner/dataset)
    #[arg(value_name = "DATASET")]
    pub dataset: String,

    /// Single file inside the dataset to download
    #[arg(long)]
    pub file: Option<String>,

    /// Destination path for the CSV
    #[arg(short, long, default_value = "dataset.csv")]
    pub output: PathBuf,

    /// Working directory for the downloaded archive (default: `kaggle_download` next to the output)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// Download tool to invoke
    #[arg(long, default_value = "kaggle")]
    pub program: String,
}

const DOWNLOAD_SUBDIR: &str = "kaggle_download";

impl DownloadArgs {
    pub fn download_dir(&self) -> PathBuf {
        match &self.download_dir {
            Some(dir) => dir.clone(),
            None => self
                .output
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .join(DOWNLOAD_SUBDIR),
        }
    }
}

/// Output formats for CLI reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_command() {
        let args = CareerLensArgs::try_parse_from([
            "careerlens",
            "train",
            "careers.csv",
            "--text-columns",
            "Education,Skills",
            "--label-column",
            "Recommended_Career",
            "--model",
            "nearest-centroid",
            "--seed",
            "7",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            assert_eq!(train_args.dataset, PathBuf::from("careers.csv"));
            assert_eq!(
                train_args.text_columns,
                Some(vec!["Education".to_string(), "Skills".to_string()])
            );
            assert_eq!(train_args.label_column.as_deref(), Some("Recommended_Career"));

            let config = train_args.training_config().unwrap();
            assert_eq!(config.model, ModelKind::NearestCentroid);
            assert_eq!(config.seed, 7);
            assert_eq!(config.test_size, 0.15);

            let paths = train_args.artifact_paths();
            assert_eq!(paths.model, PathBuf::from("models/model.bin"));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_artifact_path_overrides() {
        let args = CareerLensArgs::try_parse_from([
            "careerlens",
            "train",
            "data.csv",
            "--output-dir",
            "out",
            "--model-out",
            "elsewhere/m.bin",
        ])
        .unwrap();

        if let Command::Train(train_args) = args.command {
            let paths = train_args.artifact_paths();
            assert_eq!(paths.model, PathBuf::from("elsewhere/m.bin"));
            assert_eq!(paths.vectorizer, PathBuf::from("out/vectorizer.bin"));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_command() {
        let args = CareerLensArgs::try_parse_from([
            "careerlens",
            "predict",
            "--input",
            r#"{"text":"python"}"#,
            "-k",
            "5",
        ])
        .unwrap();

        if let Command::Predict(predict_args) = args.command {
            assert_eq!(predict_args.input.as_deref(), Some(r#"{"text":"python"}"#));
            assert_eq!(predict_args.top_k, 5);
        } else {
            panic!("Expected Predict command");
        }
    }

    #[test]
    fn test_download_dir_defaults_next_to_output() {
        let args = CareerLensArgs::try_parse_from([
            "careerlens",
            "download",
            "owner/careers",
            "--output",
            "data/careers.csv",
        ])
        .unwrap();

        if let Command::Download(download_args) = args.command {
            assert_eq!(
                download_args.download_dir(),
                PathBuf::from("data").join("kaggle_download")
            );
            assert_eq!(download_args.program, "kaggle");
        } else {
            panic!("Expected Download command");
        }
    }

    #[test]
    fn test_default_download_dir_is_not_output_dir() {
        let args =
            CareerLensArgs::try_parse_from(["careerlens", "download", "owner/careers"]).unwrap();

        if let Command::Download(download_args) = args.command {
            assert_eq!(download_args.output, PathBuf::from("dataset.csv"));
            assert_eq!(
                download_args.download_dir(),
                Path::new(".").join("kaggle_download")
            );
        } else {
            panic!("Expected Download command");
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args = CareerLensArgs::try_parse_from(["careerlens", "serve"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = CareerLensArgs::try_parse_from(["careerlens", "-vv", "serve"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        let args = CareerLensArgs::try_parse_from(["careerlens", "--quiet", "serve"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            CareerLensArgs::try_parse_from(["careerlens", "--format", "json", "serve"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
