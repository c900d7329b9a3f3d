//! Weeklypedia issue page scraper.
//!
//! Each issue page carries several `<h2>` sections, each followed by an
//! ordered list. Only the three sections readers care about are kept:
//!
//! | Heading | Contents |
//! |---------|----------|
//! | `Articles` | Most edited articles of the week |
//! | `New Articles` | Most edited articles created that week |
//! | `Discussions` | Most active talk pages |
//!
//! Issue pages are not uniformly structured, so sections are located with
//! anchored patterns that tolerate arbitrary markup between a heading and its
//! list.

use crate::fetch::Fetch;
use crate::models::{IssueContent, IssueDescriptor};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Section headings that are copied into the feed, matched exactly.
pub const SECTION_NAMES: [&str; 3] = ["Articles", "New Articles", "Discussions"];

static BODY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<body[^>]*>(.*?)</body>").unwrap());

static SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<h2[^>]*>([^<]+)</h2>(.*?<ol[^>]*>.*?</ol>)").unwrap()
});

static LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<ol[^>]*>.*?</ol>").unwrap());

/// Extract the recognized sections of an issue page.
///
/// Returns each kept section as `<h3>Name</h3>\n<ol>…</ol>`, joined by a
/// newline, or `None` when the page has no body or no recognized section.
pub fn extract_content(html: &str) -> Option<String> {
    let body = BODY_RE.captures(html)?.get(1)?.as_str();

    let sections: Vec<String> = SECTION_RE
        .captures_iter(body)
        .filter_map(|caps| {
            let heading = caps.get(1)?.as_str().trim();
            if !SECTION_NAMES.contains(&heading) {
                return None;
            }
            let list = LIST_RE.find(caps.get(2)?.as_str())?;
            Some(format!("<h3>{}</h3>\n{}", heading, list.as_str()))
        })
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.iter().join("\n"))
    }
}

/// Fetch one issue page and extract its sections.
///
/// Never fails: a fetch error is logged and degrades to
/// [`IssueContent::Absent`].
#[instrument(level = "info", skip(fetcher))]
pub async fn fetch_issue_content<F: Fetch>(fetcher: &F, url: &str) -> IssueContent {
    match fetcher.fetch(url).await {
        Ok(html) => {
            let content = IssueContent::from_fragment(extract_content(&html));
            if content.is_present() {
                debug!(bytes = html.len(), "Extracted issue sections");
            } else {
                warn!(bytes = html.len(), "Issue page produced no content");
            }
            content
        }
        Err(e) => {
            warn!(error = %e, "Failed to fetch issue; using fallback description");
            IssueContent::Absent
        }
    }
}

/// Attach content to the first `count` issues, one fetch at a time.
///
/// Waits `delay` between consecutive fetches. Issues beyond `count` are left
/// untouched.
///
/// # Returns
///
/// The number of issues that ended up with content.
#[instrument(level = "info", skip_all, fields(count = count, delay_ms = delay.as_millis() as u64))]
pub async fn enrich_issues<F: Fetch>(
    fetcher: &F,
    issues: &mut [IssueDescriptor],
    count: usize,
    delay: Duration,
) -> usize {
    let targets: Vec<(String, String)> = issues
        .iter()
        .take(count)
        .map(|issue| (issue.url.clone(), issue.date_text.clone()))
        .collect();
    let total = targets.len();

    let contents: Vec<IssueContent> = stream::iter(targets.into_iter().enumerate())
        .then(|(i, (url, date_text))| async move {
            info!(position = i + 1, total, %date_text, "Fetching issue content");
            let content = fetch_issue_content(fetcher, &url).await;
            if i + 1 < total && !delay.is_zero() {
                sleep(delay).await;
            }
            content
        })
        .collect()
        .await;

    for (issue, content) in issues.iter_mut().zip(contents) {
        issue.content = content;
    }

    let enriched = issues
        .iter()
        .take(total)
        .filter(|issue| issue.content.is_present())
        .count();
    info!(total, enriched, "Finished fetching issue content");
    enriched
}
