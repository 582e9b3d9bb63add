//! eeprobe - Asynchronous Earth Engine Object Inspector
//!
//! Loads a JSON catalog of object descriptions, dispatches every requested
//! object through the engine and prints the rendered placeholders.

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use eeprobe::{DispatchEngine, InMemorySource, Placeholder, ProbeTarget};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    // Parse command-line arguments
    let matches = Command::new("eeprobe")
        .version(eeprobe::VERSION)
        .about("Inspect Earth Engine object descriptions from a JSON catalog")
        .long_about(
            "eeprobe reads a JSON file mapping object ids to their server \
             descriptions, resolves each requested object through the async \
             dispatch engine and prints the rendered trees.",
        )
        .arg(
            Arg::new("catalog")
                .help("Path to the JSON catalog of object descriptions")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("objects")
                .help("Object ids to inspect (defaults to every catalog entry)")
                .num_args(0..)
                .index(2),
        )
        .arg(
            Arg::new("sync")
                .long("sync")
                .help("Resolve each object inline instead of in the background")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let catalog_path = PathBuf::from(
        matches
            .get_one::<String>("catalog")
            .expect("catalog argument is required"),
    );

    if !catalog_path.is_file() {
        anyhow::bail!("Catalog is not a regular file: {}", catalog_path.display());
    }

    let raw = std::fs::read_to_string(&catalog_path)?;
    let catalog: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)?;

    let ids: Vec<String> = {
        let requested: Vec<String> = matches
            .get_many::<String>("objects")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if requested.is_empty() {
            catalog.keys().cloned().collect()
        } else {
            requested
        }
    };

    let engine = DispatchEngine::new(Arc::new(InMemorySource::from_objects(catalog)));
    engine.set_default_async(!matches.get_flag("sync"));

    // One placeholder per object, dispatched up front so fetches overlap
    let mut jobs = Vec::new();
    for id in &ids {
        let placeholder = Placeholder::with_label(id.clone());
        let handle = engine
            .dispatch(
                ProbeTarget::remote(id.clone(), "ComputedObject"),
                placeholder,
            )
            .await;
        jobs.push(handle);
    }

    futures::future::join_all(jobs.iter_mut().map(|job| job.wait())).await;

    for (id, job) in ids.iter().zip(&jobs) {
        let placeholder = job.placeholder();
        println!("=== {} :: {}", id, placeholder.label());
        if let Some(tree) = placeholder.content() {
            print!("{tree}");
        }
        println!();
    }

    Ok(())
}
