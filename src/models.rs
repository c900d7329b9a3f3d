//! Data models for archive issues and their extracted content.
//!
//! This module defines the core data structures used throughout the application:
//! - [`IssueDescriptor`]: One published Weeklypedia issue as listed in the archive
//! - [`IssueContent`]: The outcome of fetching and extracting an issue page
//!
//! Descriptors are created once by the archive parser, get their content
//! attached once during enrichment, and are then only read by the feed
//! builder.

use chrono::NaiveDate;

/// Extracted content of a single issue page.
///
/// Fetch failures and pages without recognized sections both end up as
/// [`IssueContent::Absent`]; the feed then falls back to a generated
/// description for that item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IssueContent {
    /// Heading-wrapped section lists, ready to embed as item markup.
    Fragment(String),
    /// Nothing usable was fetched or extracted.
    #[default]
    Absent,
}

impl IssueContent {
    /// Wrap an optional fragment, treating empty markup as absent.
    pub fn from_fragment(fragment: Option<String>) -> Self {
        match fragment {
            Some(f) if !f.is_empty() => IssueContent::Fragment(f),
            _ => IssueContent::Absent,
        }
    }

    /// The fragment markup, if any.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            IssueContent::Fragment(f) if !f.is_empty() => Some(f),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.fragment().is_some()
    }
}

/// A published issue discovered in the archive index.
///
/// # Fields
///
/// * `url` - Absolute address of the issue page
/// * `title` - Display title, prefixed with the feed brand
/// * `date` - Issue date parsed from the `YYYYMMDD` token in the path
/// * `date_text` - The label exactly as shown in the archive, trimmed
/// * `content` - Extracted sections, [`IssueContent::Absent`] until enriched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDescriptor {
    /// Absolute URL of the issue page.
    pub url: String,
    /// Feed item title, e.g. `"Weeklypedia - Jan 2, 2025"`.
    pub title: String,
    /// Calendar date of the issue.
    pub date: NaiveDate,
    /// Human-facing date label from the archive link text.
    pub date_text: String,
    /// Extracted issue content.
    pub content: IssueContent,
}
