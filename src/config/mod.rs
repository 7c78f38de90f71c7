mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable consulted when no bearer token is configured.
pub const BEARER_TOKEN_ENV: &str = "TMDB_BEARER_TOKEN";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./marquee.toml",
        "~/.config/marquee/config.toml",
        "/etc/marquee/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Fill empty TMDB credentials from the environment.
pub fn apply_env_overrides(config: &mut Config) {
    fill_from_env(&mut config.tmdb.bearer_token, BEARER_TOKEN_ENV);
    fill_from_env(&mut config.tmdb.api_key, API_KEY_ENV);
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.as_deref().is_some_and(|v| !v.trim().is_empty()) {
        return;
    }
    if let Ok(value) = std::env::var(var) {
        let value = value.trim();
        if !value.is_empty() {
            *slot = Some(value.to_string());
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tmdb.timeout_secs == 0 {
        anyhow::bail!("tmdb.timeout_secs must be greater than 0");
    }

    if config.tmdb.requests_per_second == 0 {
        anyhow::bail!("tmdb.requests_per_second must be greater than 0");
    }

    if config.library.output_dir_name.trim().is_empty() {
        anyhow::bail!("library.output_dir_name cannot be empty");
    }

    if config.library.archived_dir_name.trim().is_empty() {
        anyhow::bail!("library.archived_dir_name cannot be empty");
    }

    Ok(())
}

/// Checks that only apply when running a build.
pub fn validate_for_build(config: &Config) -> Result<()> {
    if !config.library.has_any_root() {
        anyhow::bail!(
            "No library roots configured; set [library] movies_root, shows_root, standup_root or docs_root"
        );
    }

    for (category, root) in config.library.roots() {
        if !root.exists() {
            tracing::warn!(category = %category, "Library root does not exist: {:?}", root);
        }
    }

    Ok(())
}
