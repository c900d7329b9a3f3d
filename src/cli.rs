//! Command-line interface definitions for Weeklypedia RSS.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every flag is optional: unset flags leave the value from the config file
//! (or the built-in default) untouched.

use crate::config::FeedConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the Weeklypedia RSS generator.
///
/// # Examples
///
/// ```sh
/// # Defaults: 50 items, content for the 10 newest issues, written to feed.xml
/// weeklypedia_rss
///
/// # Custom output and fewer content fetches
/// weeklypedia_rss -o public/feed.xml --fetch-content-count 3
///
/// # Settings from a YAML file, with one override
/// weeklypedia_rss -c weeklypedia.yaml --max-items 20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Where to write the feed document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of items in the feed
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Number of most recent issues to fetch full content for
    #[arg(long)]
    pub fetch_content_count: Option<usize>,

    /// Delay between issue fetches, in milliseconds
    #[arg(long)]
    pub fetch_delay_ms: Option<u64>,

    /// Archive index page listing every issue
    #[arg(long, env = "WEEKLYPEDIA_ARCHIVE_URL")]
    pub archive_url: Option<String>,

    /// Base address that issue paths are appended to
    #[arg(long, env = "WEEKLYPEDIA_BASE_URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Overlay the flags that were given on top of `config`.
    pub fn apply(&self, mut config: FeedConfig) -> FeedConfig {
        if let Some(ref output) = self.output {
            config.output_path = output.clone();
        }
        if let Some(max_items) = self.max_items {
            config.max_items = max_items;
        }
        if let Some(count) = self.fetch_content_count {
            config.fetch_content_count = count;
        }
        if let Some(delay) = self.fetch_delay_ms {
            config.fetch_delay_ms = delay;
        }
        if let Some(ref archive_url) = self.archive_url {
            config.archive_url = archive_url.clone();
        }
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        config
    }
}
