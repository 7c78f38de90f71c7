mod cli;

use marquee::{
    catalog::{self, PlaybackIndex},
    config::{self, Config},
    logging::{self, LogOptions},
    metadata::{MetadataProvider, TmdbProvider},
    pipeline::Pipeline,
};
use marquee_common::Category;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root and output overrides given on the command line.
struct BuildOverrides {
    movies_root: Option<PathBuf>,
    shows_root: Option<PathBuf>,
    standup_root: Option<PathBuf>,
    docs_root: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

impl BuildOverrides {
    fn apply(self, config: &mut Config) {
        let library = &mut config.library;
        library.movies_root = self.movies_root.or(library.movies_root.take());
        library.shows_root = self.shows_root.or(library.shows_root.take());
        library.standup_root = self.standup_root.or(library.standup_root.take());
        library.docs_root = self.docs_root.or(library.docs_root.take());
        library.output_dir = self.output_dir.or(library.output_dir.take());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let quiet = matches!(cli.command, Commands::Build { quiet: true, .. });
    let config = match &cli.command {
        Commands::Validate { .. } | Commands::Version => None,
        _ => Some(config::load_config_or_default(cli.config.as_deref())?),
    };
    let logging_config = config.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    logging::init(LogOptions::from_sources(cli.verbose, quiet, &logging_config));

    match cli.command {
        Commands::Build {
            movies_root,
            shows_root,
            standup_root,
            docs_root,
            output_dir,
            quiet: _,
        } => {
            let mut config = config.unwrap_or_default();
            BuildOverrides {
                movies_root,
                shows_root,
                standup_root,
                docs_root,
                output_dir,
            }
            .apply(&mut config);
            build(config)
        }
        Commands::Resolve { category, id } => resolve(&config.unwrap_or_default(), category, &id),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn build(config: Config) -> Result<()> {
    config::validate_for_build(&config)?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(&config.tmdb)?);
    if !provider.is_available() {
        tracing::warn!(
            "No TMDB credentials; set {} or {} to enable enrichment",
            config::BEARER_TOKEN_ENV,
            config::API_KEY_ENV
        );
    }

    let pipeline = Pipeline::new(config, provider)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = rt.block_on(pipeline.run())?;

    println!("Catalog written to {}", report.output_dir.display());
    println!("{}", report.stats);
    Ok(())
}

fn resolve(config: &Config, category: Category, id: &str) -> Result<()> {
    let root = config
        .library
        .root(category)
        .with_context(|| format!("No root configured for {category}"))?;
    let output_dir = config
        .library
        .resolved_output_dir()
        .context("Cannot determine the output directory")?;

    let index_path = output_dir.join(catalog::index_file_name(category));
    let index = PlaybackIndex::load(&index_path, root)?;
    let path = index
        .resolve(id)
        .ok_or_else(|| marquee_common::Error::not_found(format!("No playable file for {id}")))?;

    println!("{}", path.display());
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            for (category, root) in config.library.roots() {
                let note = if root.is_dir() { "" } else { " (missing)" };
                println!("  {}: {}{}", category, root.display(), note);
            }
            match config.library.resolved_output_dir() {
                Some(dir) => println!("  Output: {}", dir.display()),
                None => println!("  Output: (no library roots configured)"),
            }
            let has_credentials = config.tmdb.bearer_token.is_some() || config.tmdb.api_key.is_some();
            println!("  TMDB credentials: {}", if has_credentials { "yes" } else { "no" });
        }
        None => {
            println!("No config file specified, using defaults");
            let config = Config::default();
            println!("Default config:");
            println!("  TMDB: {} ({})", config.tmdb.base_url, config.tmdb.language);
            println!("  Output dir name: {}", config.library.output_dir_name);
        }
    }

    Ok(())
}
