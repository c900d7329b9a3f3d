//! Weeklypedia archive index scraper.
//!
//! The archive page lists every issue as a plain anchor:
//!
//! ```html
//! <a href="20250102/weeklypedia_20250102.html">Jan 2, 2025</a>
//! ```
//!
//! Links are matched by that exact shape rather than by walking the DOM, so
//! unrelated markup around them does not matter. The page lists issues
//! newest-first and the parser keeps that order.

use crate::config::FeedConfig;
use crate::fetch::{Fetch, FetchError};
use crate::models::{IssueContent, IssueDescriptor};
use crate::utils::truncate_for_log;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

static ISSUE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<a href="((\d{8})/weeklypedia_(\d{8})\.html)">([^<]+)</a>"#).unwrap()
});

static DATE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{8}").unwrap());

/// Parse a strict `YYYYMMDD` token into a calendar date.
pub fn parse_date_token(token: &str) -> Option<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token[0..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    let day: u32 = token[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract issue descriptors from the archive index markup.
///
/// Entries whose path tokens disagree or whose date is not a real calendar
/// date are skipped. Order follows the markup and duplicates are kept.
///
/// # Arguments
///
/// * `html` - Archive index page
/// * `config` - Supplies the base URL and the title prefix
pub fn parse_index(html: &str, config: &FeedConfig) -> Vec<IssueDescriptor> {
    let mut issues = Vec::new();

    for caps in ISSUE_LINK_RE.captures_iter(html) {
        let path = &caps[1];
        if caps[2] != caps[3] {
            debug!(%path, "Skipping issue link with mismatched date tokens");
            continue;
        }

        let Some(date) = DATE_TOKEN_RE
            .find(path)
            .and_then(|token| parse_date_token(token.as_str()))
        else {
            debug!(%path, "Skipping issue link with invalid date");
            continue;
        };

        let date_text = caps[4].trim().to_string();
        issues.push(IssueDescriptor {
            url: format!("{}{}", config.base_url, path),
            title: format!("{} - {}", config.title, date_text),
            date,
            date_text,
            content: IssueContent::Absent,
        });
    }

    issues
}

/// Fetch the archive index and parse every listed issue.
///
/// A fetch failure here is returned to the caller: without the index there is
/// nothing to build a feed from.
#[instrument(level = "info", skip_all, fields(archive_url = %config.archive_url))]
pub async fn index_issues<F: Fetch>(
    fetcher: &F,
    config: &FeedConfig,
) -> Result<Vec<IssueDescriptor>, FetchError> {
    let html = fetcher.fetch(&config.archive_url).await?;
    let issues = parse_index(&html, config);

    if issues.is_empty() {
        warn!(
            bytes = html.len(),
            preview = %truncate_for_log(&html, 300),
            "Archive index contained no issue links"
        );
    } else {
        info!(
            count = issues.len(),
            newest = %issues[0].date,
            "Indexed Weeklypedia issues"
        );
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(token: &str, label: &str) -> String {
        format!(r#"<li><a href="{token}/weeklypedia_{token}.html">{label}</a></li>"#)
    }

    #[test]
    fn test_parse_preserves_order() {
        let html = format!(
            "<ul>{}{}{}</ul>",
            link("20250116", "Jan 16, 2025"),
            link("20250109", "Jan 9, 2025"),
            link("20250102", "Jan 2, 2025"),
        );
        let issues = parse_index(&html, &FeedConfig::default());
        let labels: Vec<&str> = issues.iter().map(|i| i.date_text.as_str()).collect();
        assert_eq!(labels, vec!["Jan 16, 2025", "Jan 9, 2025", "Jan 2, 2025"]);
    }

    #[test]
    fn test_parse_does_not_sort_by_date() {
        let html = format!(
            "{}{}",
            link("20240101", "Jan 1, 2024"),
            link("20250101", "Jan 1, 2025"),
        );
        let issues = parse_index(&html, &FeedConfig::default());
        assert_eq!(issues[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(issues[1].date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_invalid_date_dropped() {
        let html = format!(
            "{}{}{}",
            link("20250109", "Jan 9, 2025"),
            link("99999999", "Never"),
            link("20250102", "Jan 2, 2025"),
        );
        let issues = parse_index(&html, &FeedConfig::default());
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.date_text != "Never"));
    }

    #[test]
    fn test_url_title_and_date_derivation() {
        let config = FeedConfig::default();
        let html = link("20250102", " Jan 2, 2025 ");
        let issues = parse_index(&html, &config);

        assert_eq!(issues.len(), 1);
        let issue = &issues[0];
        assert_eq!(
            issue.url,
            format!("{}20250102/weeklypedia_20250102.html", config.base_url)
        );
        assert_eq!(issue.title, "Weeklypedia - Jan 2, 2025");
        assert_eq!(issue.date, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(issue.date_text, "Jan 2, 2025");
        assert_eq!(issue.content, IssueContent::Absent);
    }

    #[test]
    fn test_empty_and_unrelated_input() {
        let config = FeedConfig::default();
        assert!(parse_index("", &config).is_empty());
        assert!(
            parse_index(
                r#"<a href="about.html">About</a><a href="2025/weeklypedia.html">x</a>"#,
                &config
            )
            .is_empty()
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = format!(
            "{}{}",
            link("20250102", "Jan 2, 2025"),
            link("20250102", "Jan 2, 2025"),
        );
        let issues = parse_index(&html, &FeedConfig::default());
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0], issues[1]);
    }

    #[test]
    fn test_mismatched_tokens_skipped() {
        let html = r#"<a href="20250102/weeklypedia_20250109.html">Jan 2, 2025</a>"#;
        assert!(parse_index(html, &FeedConfig::default()).is_empty());
    }

    #[test]
    fn test_anchor_with_extra_attributes_ignored() {
        let html = r#"<a class="x" href="20250102/weeklypedia_20250102.html">Jan 2, 2025</a>"#;
        assert!(parse_index(html, &FeedConfig::default()).is_empty());
    }

    #[test]
    fn test_parse_date_token() {
        assert_eq!(
            parse_date_token("20240229"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date_token("20230229"), None);
        assert_eq!(parse_date_token("20251301"), None);
        assert_eq!(parse_date_token("2025010"), None);
        assert_eq!(parse_date_token("2025-1-2"), None);
    }
}
