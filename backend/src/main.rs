use anyhow::Result;
use clap::{Parser, Subcommand};
use spinlist_core::domain::Namespace;
use spinlist_core::services::SlugOptions;
use spinlist_lib::{AppState, SlugsConfig, effective_config, load_dotenv};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Target matching is by prefix, so this covers every `spinlist_*` crate.
const DEFAULT_FILTER: &str = "spinlist=info";

#[derive(Debug, Parser)]
#[command(name = "spinlist", version, about = "Slugs for album and artist pages")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// Get or create the slug of an album, by external id
  Album { id: String },

  /// Get or create the slug of an artist, by external id
  Artist {
    id: String,

    /// Skip the catalog import even if `[slugs].sync_catalog` is on
    #[arg(long)]
    no_sync: bool,
  },

  /// Resolve a page path segment (slug or id) to the stored entity
  Resolve {
    /// `album` or `artist`
    namespace: Namespace,
    segment: String,
  },

  /// Print the effective configuration
  Config,
}

#[tokio::main]
async fn main() -> Result<()> {
  let dotenv = load_dotenv();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
    .with_writer(std::io::stderr)
    .init();

  match dotenv {
    Ok(Some(path)) => info!(path = %path.display(), "loaded environment file"),
    Ok(None) => {}
    Err(e) => warn!(error = %e, "failed to load .env file"),
  }

  let cli = Cli::parse();

  match cli.command {
    Command::Config => {
      let cfg = effective_config()?;
      println!("{}", serde_json::to_string_pretty(&cfg)?);
    }
    Command::Album { id } => {
      let state = AppState::init(slug_options()?)?;
      println!("{}", state.album_slug(&id).await?);
    }
    Command::Artist { id, no_sync } => {
      // A CLI process exits right after printing, which would cut a detached
      // import short. Run it in the foreground instead.
      let mut options = slug_options()?;
      let sync = options.sync_catalog && !no_sync;
      options.sync_catalog = false;

      let state = AppState::init(options)?;
      let slug = state.artist_slug(&id).await?;
      println!("{slug}");

      if sync {
        let report = state.sync_catalog(&id).await;
        info!(
          seen = report.albums_seen,
          added = report.albums_added,
          slugs = report.slugs_created,
          failures = report.failures,
          "catalog import finished"
        );
      }
    }
    Command::Resolve { namespace, segment } => {
      let state = AppState::init(slug_options()?)?;
      match state.resolve_segment(namespace, &segment).await? {
        Some(entity) => println!("{}", serde_json::to_string_pretty(&entity)?),
        None => {
          eprintln!("{namespace} {segment:?} not found");
          std::process::exit(1);
        }
      }
    }
  }

  Ok(())
}

fn slug_options() -> Result<SlugOptions> {
  Ok(SlugsConfig::load()?.into())
}
