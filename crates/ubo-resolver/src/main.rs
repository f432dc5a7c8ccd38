//! ubo-resolve
//!
//! Resolve the ultimate owners of one entity and print the result as JSON.
//! Reads the graph from the configured ownership source, or from a local
//! snapshot with `--graph-file`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ubo_core::{CancelFlag, OwnershipGraph};
use ubo_resolver::{HttpGraphSource, InMemoryGraphSource, ResolverConfig, UboResolver};

#[derive(Debug, Parser)]
#[command(name = "ubo-resolve", about = "Resolve the ultimate beneficial owners of an entity")]
struct Cli {
    /// Entity id to resolve owners for
    #[arg(long)]
    entity: String,

    /// YAML configuration file
    #[arg(long, env = "UBO_RESOLVER_CONFIG")]
    config: Option<PathBuf>,

    /// Resolve against a JSON graph snapshot instead of the ownership source
    #[arg(long)]
    graph_file: Option<PathBuf>,

    /// Override the maximum number of explored paths
    #[arg(long)]
    max_paths: Option<usize>,

    /// Override the maximum path length (ownership links)
    #[arg(long)]
    max_path_length: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ubo_resolver=info,ubo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ResolverConfig::default(),
    }
    .apply_env();

    if let Some(max_paths) = cli.max_paths {
        config.limits.max_paths = max_paths;
    }
    if let Some(max_path_length) = cli.max_path_length {
        config.limits.max_path_length = max_path_length;
    }

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling resolution");
            on_interrupt.cancel();
        }
    });

    let resolution = match &cli.graph_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read graph snapshot {}", path.display()))?;
            let graph = OwnershipGraph::from_json(&content)
                .with_context(|| format!("Invalid graph snapshot {}", path.display()))?;
            tracing::info!(path = %path.display(), entity = %cli.entity, "Resolving from snapshot");

            let source = InMemoryGraphSource::new().with_graph(cli.entity.clone(), graph);
            UboResolver::new(source, config.limits.clone())
                .resolve_with_cancel(&cli.entity, &cancel)
                .await?
        }
        None => {
            tracing::info!(
                base_url = %config.source.base_url,
                entity = %cli.entity,
                "Resolving from ownership source"
            );
            let source = HttpGraphSource::new(&config.source)?;
            UboResolver::new(source, config.limits.clone())
                .resolve_with_cancel(&cli.entity, &cancel)
                .await?
        }
    };

    if let Some(truncation) = &resolution.truncation {
        tracing::warn!(
            reason = ?truncation.reason,
            limit = truncation.limit,
            length_capped = truncation.length_capped,
            "Results may be incomplete"
        );
    }
    if resolution.has_incomplete_chains() {
        tracing::warn!("Some ownership chains end at a dead end in the source data");
    }

    let output = if cli.pretty {
        serde_json::to_string_pretty(&resolution)?
    } else {
        serde_json::to_string(&resolution)?
    };
    println!("{output}");

    Ok(())
}
