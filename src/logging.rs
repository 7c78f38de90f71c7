//! Logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Verbosity chosen from CLI flags and the `[logging]` section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    pub quiet: bool,
}

impl LogOptions {
    /// Either source can switch a flag on.
    pub fn from_sources(verbose_flag: bool, quiet_flag: bool, config: &LoggingConfig) -> Self {
        Self {
            verbose: verbose_flag || config.verbose,
            quiet: quiet_flag || config.quiet,
        }
    }

    /// Filter used when `RUST_LOG` is not set.
    pub fn filter_directives(&self) -> String {
        let mut directives = if self.verbose {
            // Verbose mode: trace for marquee, debug for HTTP
            "marquee=trace,marquee_common=trace,marquee_parser=trace,reqwest=debug".to_string()
        } else {
            "marquee=info,marquee_common=info,marquee_parser=info,reqwest=warn".to_string()
        };
        if self.quiet {
            directives.push_str(",marquee::metadata=warn,marquee::images=warn");
        }
        directives
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `options`.
pub fn init(options: LogOptions) {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| options.filter_directives());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .init();
}
