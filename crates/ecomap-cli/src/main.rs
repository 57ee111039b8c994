mod locations;
mod render;

use clap::{Parser, Subcommand};
use ecomap_core::ActiveFilterSet;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ecomap")]
#[command(about = "Malaysia environmental map data command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load nationwide locations (live, with bundled fallback) and list them
    Fetch {
        /// Comma-separated categories to include (default: all)
        #[arg(long)]
        categories: Option<ActiveFilterSet>,
        /// Print the points as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render locations into a GeoJSON map in batches
    Render {
        /// Comma-separated categories to include (default: all)
        #[arg(long)]
        categories: Option<ActiveFilterSet>,
        /// Destination file; the collection is printed to stdout when omitted
        #[arg(long)]
        output: Option<std::path::PathBuf>,
        /// Markers per batch (overrides `ECOMAP_RENDER_CHUNK_SIZE`)
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Print the directions link for a location
    Directions {
        /// Location identifier as listed by `fetch`
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ecomap_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Some(Commands::Fetch { categories, json }) => {
            locations::run_fetch(&config, &categories.unwrap_or_default(), json).await?;
        }
        Some(Commands::Render {
            categories,
            output,
            chunk_size,
        }) => {
            render::run_render(
                &config,
                &categories.unwrap_or_default(),
                output.as_deref(),
                chunk_size.unwrap_or(config.render_chunk_size),
            )
            .await?;
        }
        Some(Commands::Directions { id }) => locations::run_directions(&config, id).await?,
        None => println!("ecomap: run `ecomap --help` for available commands"),
    }

    Ok(())
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// stays machine-readable.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
