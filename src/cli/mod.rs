//! Command-line interface
//!
//! Training, one-off prediction, and server mode.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

use crate::artifact::{ArtifactStore, FsArtifactStore, ModelArtifact};
use crate::data::{load_corpus, FsCorpusSource};
use crate::inference::InferenceEngine;
use crate::lookup::LookupStore;
use crate::schema::Schema;
use crate::server::{run_server, ServerConfig};
use crate::training::{Trainer, TrainerConfig};

fn step_run(msg: &str) {
    println!("  {} {}", "›".blue(), msg);
}

fn step_ok(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

#[derive(Parser)]
#[command(name = "lifeboat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Titanic survival prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model and write the artifact
    Train {
        /// Training corpus (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Output artifact file
        #[arg(short, long, default_value = "titanic_model.json")]
        model: PathBuf,

        /// Held-out fraction for the test split
        #[arg(long, default_value_t = 0.3)]
        test_fraction: f64,

        /// Seed for the shuffle split
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Predict survival for one passenger identifier
    Predict {
        /// Trained artifact file
        #[arg(short, long)]
        model: PathBuf,

        /// Lookup corpus (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Passenger identifier
        #[arg(long)]
        id: String,
    },

    /// Run the HTTP server
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value_t = 8001)]
        port: u16,

        /// Lookup corpus (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Trained artifact file
        #[arg(short, long)]
        model: PathBuf,
    },
}

pub fn cmd_train(
    data: &Path,
    model: &Path,
    test_fraction: f64,
    seed: u64,
) -> anyhow::Result<()> {
    step_run(&format!("loading corpus from {}", data.display()));
    let records = load_corpus(&FsCorpusSource::new(data))?;
    step_ok(&format!("{} rows", records.len()));

    step_run("training");
    let config = TrainerConfig {
        test_fraction,
        seed,
        ..Default::default()
    };
    let (artifact, report) = Trainer::new(config).run(&records, &Schema::titanic())?;

    println!("  Train Accuracy: {:.2}", report.train_accuracy);
    println!("  Test Accuracy:  {:.2}", report.test_accuracy);

    FsArtifactStore::new(model).store(&artifact.to_bytes()?)?;
    step_ok(&format!("artifact written to {}", model.display()));
    Ok(())
}

pub fn cmd_predict(model: &Path, data: &Path, id: &str) -> anyhow::Result<()> {
    let artifact = ModelArtifact::from_bytes(&FsArtifactStore::new(model).fetch()?)?;
    let records = load_corpus(&FsCorpusSource::new(data))?;
    let lookup = LookupStore::build(&records, artifact.preprocessor.schema());

    let engine = InferenceEngine::new(artifact, lookup);
    let verdict = engine.predict(id)?;

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

pub async fn cmd_serve(host: &str, port: u16, data: &Path, model: &Path) -> anyhow::Result<()> {
    let config = ServerConfig {
        host: host.to_string(),
        port,
        data_path: data.to_path_buf(),
        model_path: model.to_path_buf(),
    };
    run_server(config).await
}
