//! Feed configuration.
//!
//! All the values that describe the feed and where its data comes from live in
//! a single [`FeedConfig`]. It starts from built-in defaults, can be overlaid
//! with a YAML file (`--config`), and finally with individual CLI flags
//! (see [`crate::cli::Cli::apply`]).
//!
//! ```yaml
//! title: Weeklypedia
//! max_items: 25
//! fetch_content_count: 5
//! output_path: public/feed.xml
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Errors raised while loading or validating a [`FeedConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`FeedConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// One of the URL fields does not parse
    #[error("invalid URL for `{field}`: {value} ({source})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Static description of the feed plus the knobs of a single run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Channel title, also used as the prefix of every item title.
    pub title: String,
    /// Channel link.
    pub link: String,
    /// Channel description.
    pub description: String,
    /// Channel language code.
    pub language: String,
    /// Page listing every published issue.
    pub archive_url: String,
    /// Prefix joined with each issue's relative path.
    pub base_url: String,
    /// Maximum number of `<item>` elements in the feed.
    pub max_items: usize,
    /// How many of the most recent issues get their content fetched.
    pub fetch_content_count: usize,
    /// Pause between consecutive issue fetches, in milliseconds.
    pub fetch_delay_ms: u64,
    /// Where the feed document is written.
    pub output_path: PathBuf,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Weeklypedia".to_string(),
            link: "https://weekly.hatnote.com/".to_string(),
            description: "The most edited Wikipedia articles and discussions from the last week"
                .to_string(),
            language: "en".to_string(),
            archive_url: "https://weekly.hatnote.com/archive/en/index.html".to_string(),
            base_url: "https://weekly.hatnote.com/archive/en/".to_string(),
            max_items: 50,
            fetch_content_count: 10,
            fetch_delay_ms: 200,
            output_path: PathBuf::from("feed.xml"),
        }
    }
}

impl FeedConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!("Loaded configuration");
        Ok(config)
    }

    /// Check that every URL field is absolute and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("link", &self.link),
            ("archive_url", &self.archive_url),
            ("base_url", &self.base_url),
        ] {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FeedConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.language, "en");
        assert_eq!(config.max_items, 50);
        assert_eq!(config.fetch_content_count, 10);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FeedConfig::from_yaml_str("max_items: 5\noutput_path: out/rss.xml\n").unwrap();
        assert_eq!(config.max_items, 5);
        assert_eq!(config.output_path, PathBuf::from("out/rss.xml"));
        assert_eq!(config.title, "Weeklypedia");
        assert_eq!(config.fetch_delay_ms, 200);
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        let err = FeedConfig::from_yaml_str("max_items: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_url_names_field() {
        let config = FeedConfig {
            base_url: "archive/en/".to_string(),
            ..FeedConfig::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidUrl { field, .. }) => assert_eq!(field, "base_url"),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let path = std::env::temp_dir().join("weeklypedia_rss_missing_config.yaml");
        let _ = std::fs::remove_file(&path);
        let err = FeedConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let path = std::env::temp_dir().join("weeklypedia_rss_test_config.yaml");
        std::fs::write(&path, "title: Test Digest\nfetch_content_count: 2\n").unwrap();
        let config = FeedConfig::load(&path).await.unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(config.title, "Test Digest");
        assert_eq!(config.fetch_content_count, 2);
    }
}
