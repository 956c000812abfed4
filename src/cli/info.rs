//! Model info command

use std::path::PathBuf;

use anyhow::Result;

use super::{load_config, model_path};
use crate::loader::read_artifact;
use crate::model::{features::is_binary_feature, Estimator, FEATURE_NAMES, N_FEATURES};

/// Show model information
pub async fn info(model: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(None)?;
    let path = model_path(&mut config, model);

    let (artifact, source) = read_artifact(&path)?;

    println!("Model: {}\n", source.path.display());
    println!("Format: {:?}", source.format);
    println!("Kind: {}", artifact.kind());

    if let Some(name) = &artifact.metadata.name {
        println!("Name: {}", name);
    }
    if let Some(version) = &artifact.metadata.version {
        println!("Version: {}", version);
    }

    println!("Input features: {}", artifact.n_features());
    if artifact.n_features() != N_FEATURES {
        println!(
            "  WARNING: this service sends {} features; the server will refuse this model",
            N_FEATURES
        );
    }

    match &artifact.estimator {
        Estimator::LogisticRegression(m) => {
            println!("Classes: {:?}", m.classes);
            println!("Intercept: {}", m.intercept);
            println!("Scaler: {}", if m.scaler.is_some() { "standard" } else { "none" });
        }
        Estimator::RandomForest(m) => {
            println!("Classes: {:?}", m.classes);
            println!("Trees: {}", m.trees.len());
            let nodes: usize = m.trees.iter().map(|t| t.children_left.len()).sum();
            println!("Total nodes: {}", nodes);
        }
        Estimator::DecisionTree(m) => {
            println!("Classes: {:?}", m.classes);
            println!("Nodes: {}", m.tree.children_left.len());
        }
    }

    println!("\nExpected request fields (in model column order):");
    for (i, name) in FEATURE_NAMES.iter().enumerate() {
        let kind = if is_binary_feature(name) { "0/1" } else { "number" };
        let fitted = artifact
            .metadata
            .feature_names
            .as_ref()
            .and_then(|names| names.get(i))
            .filter(|fitted| fitted.as_str() != *name)
            .map(|fitted| format!("  (artifact says {:?})", fitted))
            .unwrap_or_default();
        println!("  {:2}. {:<26} {}{}", i, name, kind, fitted);
    }

    Ok(())
}
