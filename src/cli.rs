use clap::{Parser, Subcommand};
use marquee_common::Category;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about = "Media library cataloger with TMDB enrichment")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the library, enrich it and write the catalog
    Build {
        /// Movies root (overrides config)
        #[arg(long)]
        movies_root: Option<PathBuf>,

        /// TV shows root (overrides config)
        #[arg(long)]
        shows_root: Option<PathBuf>,

        /// Stand-up specials root (overrides config)
        #[arg(long)]
        standup_root: Option<PathBuf>,

        /// Documentaries root (overrides config)
        #[arg(long)]
        docs_root: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Only log provider and asset warnings
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the playable file for a catalog id or episode key
    Resolve {
        /// Category the id belongs to
        #[arg(long, value_parser = parse_category)]
        category: Category,

        /// Entry id (`m3`) or episode key (`tv1_S01E02`)
        id: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse().map_err(|e: marquee_common::Error| e.to_string())
}
