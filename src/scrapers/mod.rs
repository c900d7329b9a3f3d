//! Weeklypedia scrapers.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing** ([`archive`]): Fetch the archive page and turn every issue
//!    link into an [`IssueDescriptor`](crate::models::IssueDescriptor)
//! 2. **Enrichment** ([`issue`]): Fetch the most recent issue pages one at a
//!    time and attach their extracted sections
//!
//! Both phases use targeted pattern matching instead of a DOM parser. The
//! parsing functions are pure; only `index_issues` and `enrich_issues` touch
//! the network, through the [`Fetch`](crate::fetch::Fetch) trait.
//!
//! Failures are handled per phase:
//! - Index fetch failure is returned to the caller and aborts the run
//! - Issue fetch failure is logged and the issue keeps no content

pub mod archive;
pub mod issue;
