//! User configuration for botshelf.
//!
//! Read once at startup from `$XDG_CONFIG_HOME/botshelf/config.toml`. Every key
//! is optional; a missing file means defaults. A malformed file is a soft
//! failure: the parse error goes to stderr and defaults are used, so a typo in
//! the config never prevents startup.
//!
//! ```toml
//! theme = "dark"
//! catalog_dir = "/usr/share/botshelf/data"
//! api_base_url = "https://api.github.com"
//! token_env = "GITHUB_TOKEN"
//! request_timeout_secs = 10
//! log_filter = "botshelf=debug,info"
//!
//! [submit]
//! contact = "+62 812-0000-0000"
//! template = "template.json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use botshelf_core::github::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: String,
    pub catalog_dir: PathBuf,
    pub api_base_url: String,
    /// Name of the environment variable holding the GitHub token.
    pub token_env: String,
    pub request_timeout_secs: u64,
    pub log_filter: String,
    pub submit: SubmitInfo,
}

/// Text of the "submit your bot" panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitInfo {
    pub contact: String,
    pub template: String,
    pub rules: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            catalog_dir: PathBuf::from("data"),
            api_base_url: DEFAULT_API_BASE.to_owned(),
            token_env: "GITHUB_TOKEN".to_owned(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_filter: "info".to_owned(),
            submit: SubmitInfo::default(),
        }
    }
}

impl Default for SubmitInfo {
    fn default() -> Self {
        Self {
            contact: "the catalog maintainer".to_owned(),
            template: "template.json".to_owned(),
            rules: "Bots must be built on a public base or use an approved bot API.".to_owned(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Reads the GitHub token from the configured environment variable.
    pub fn github_token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.trim().is_empty())
    }
}

/// Returns `$XDG_CONFIG_HOME/botshelf/config.toml`, falling back to
/// `~/.config/botshelf/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("botshelf").join("config.toml")
}

/// Loads the config from the default path. Never fails.
pub fn load() -> Config {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Config {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };
    match parse(&raw) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("botshelf: config parse error in {:?}: {}", path, e);
            Config::default()
        }
    }
}

fn parse(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        assert_eq!(config.catalog_dir, PathBuf::from("data"));
        assert_eq!(config.token_env, "GITHUB_TOKEN");
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = parse(
            r#"
            theme = "dark"
            request_timeout_secs = 3

            [submit]
            contact = "+62 812"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.submit.contact, "+62 812");
        assert_eq!(config.submit.template, "template.json");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = parse("request_timeout_secs = 0").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join(format!("botshelf-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "theme = [unclosed").unwrap();
        let config = load_from(&path);
        assert_eq!(config.theme, "catppuccin-mocha");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
