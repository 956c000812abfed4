//! CLI commands

mod info;
mod predict;
mod serve;

pub use info::info;
pub use predict::predict;
pub use serve::serve;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::HfpConfig;

/// hfp - heart failure prediction service
#[derive(Parser)]
#[command(name = "hfp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction server
    Serve {
        /// Path to the model artifact (default: hfp.json)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// Port to listen on (default: 5000)
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// YAML or JSON configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Score a single JSON record and print the response
    Predict {
        /// Path to the model artifact (default: hfp.json)
        #[arg(long, short)]
        model: Option<PathBuf>,

        /// JSON file holding the record (default: stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },

    /// Show model artifact information
    Info {
        /// Path to the model artifact (default: hfp.json)
        #[arg(long, short)]
        model: Option<PathBuf>,
    },
}

/// Resolve configuration from an optional file and the environment
pub fn load_config(path: Option<&Path>) -> Result<HfpConfig> {
    let mut config = match path {
        Some(path) => HfpConfig::from_file(path)?,
        None => HfpConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

/// Artifact path after applying a CLI override
fn model_path(config: &mut HfpConfig, model: Option<PathBuf>) -> PathBuf {
    if let Some(model) = model {
        config.model.path = model;
    }
    config.model.resolved_path()
}
