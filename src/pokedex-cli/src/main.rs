//! Pokédex CLI - resolve evolution chains from PokéAPI.

mod render;
mod species;

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pokedex_evolution::{
    EvolutionChainResolver, RegionalChain, Resolution, ResolverConfig, SpeciesId,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{render_chain, render_variant};
use crate::species::SpeciesArg;

/// Pokédex evolution resolver
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Resolve Pokémon evolution chains from PokéAPI")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the evolution chain of a species
    Resolve {
        /// Species name, id or species URL
        species: SpeciesArg,

        /// Id of the Pokémon being viewed (defaults to the species id)
        #[arg(long)]
        current: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,

        /// Also resolve the root's regional side-chains
        #[arg(long)]
        variants: bool,
    },

    /// List the regional variant lines of a species
    Variants {
        /// Species name, id or species URL
        species: SpeciesArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tree)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented tree (default)
    #[default]
    Tree,
    /// Pretty-printed JSON
    Json,
}

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&str>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load config from {path}")),
        None => ResolverConfig::from_env().context("Failed to load config from environment"),
    }
}

/// Cancel `token` on Ctrl+C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, cancelling");
            token.cancel();
        }
    });
}

async fn run_resolve(
    resolver: &EvolutionChainResolver,
    species: &SpeciesArg,
    current: Option<u32>,
    format: OutputFormat,
    with_variants: bool,
) -> Result<()> {
    let detail = resolver
        .lookup_species(&species.lookup_key())
        .await
        .with_context(|| format!("Failed to look up species '{}'", species.lookup_key()))?;

    let species_url = match species {
        SpeciesArg::Url { url, .. } => url.clone(),
        _ => resolver.species_url(detail.id),
    };
    let current = current.map_or(SpeciesId(detail.id), SpeciesId);

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());
    let resolution = resolver
        .resolve_with_cancel(&species_url, current, &cancel)
        .await;

    let variants: Vec<RegionalChain> = match resolution.chain() {
        Some(chain) if with_variants => resolver
            .spawn_variant_discovery(chain.root_species_name())
            .await
            .context("Variant discovery task failed")?,
        _ => Vec::new(),
    };

    match format {
        OutputFormat::Json => {
            let output = if with_variants {
                json!({ "resolution": resolution, "variants": variants })
            } else {
                serde_json::to_value(&resolution)?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tree => match &resolution {
            Resolution::Resolved(chain) => {
                print!("{}", render_chain(chain));
                for variant in &variants {
                    println!();
                    print!("{}", render_variant(variant));
                }
            }
            Resolution::NotEvolving => println!("{} does not evolve", detail.name),
            Resolution::FetchError { .. } | Resolution::Cancelled => {}
        },
    }

    match resolution {
        Resolution::FetchError { message } => bail!("Failed to resolve evolution chain: {message}"),
        Resolution::Cancelled => bail!("Resolution cancelled"),
        Resolution::NotEvolving | Resolution::Resolved(_) => Ok(()),
    }
}

async fn run_variants(
    resolver: &EvolutionChainResolver,
    species: &SpeciesArg,
    format: OutputFormat,
) -> Result<()> {
    let detail = resolver
        .lookup_species(&species.lookup_key())
        .await
        .with_context(|| format!("Failed to look up species '{}'", species.lookup_key()))?;

    let variants = resolver.detect_regional_variants(&detail.name).await;
    let chains = resolver.resolve_variant_chains(&variants).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&chains)?),
        OutputFormat::Tree if chains.is_empty() => {
            println!("{} has no regional variant lines", detail.name);
        }
        OutputFormat::Tree => {
            for (i, chain) in chains.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print!("{}", render_variant(chain));
            }
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let resolver =
        EvolutionChainResolver::from_config(&config).context("Failed to build resolver")?;

    match args.command {
        Command::Resolve {
            species,
            current,
            format,
            variants,
        } => run_resolve(&resolver, &species, current, format, variants).await,
        Command::Variants { species, format } => run_variants(&resolver, &species, format).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    if let Err(e) = run(args).await {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
