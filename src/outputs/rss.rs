//! RSS 2.0 feed generation.
//!
//! Serializes issues into a single RSS document:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0">
//!   <channel>
//!     <title/> <link/> <description/> <language/>
//!     <lastBuildDate/>          (only when there is at least one issue)
//!     <item>
//!       <title/> <link/> <guid/> <pubDate/> <description/>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! Extracted issue content is embedded as CDATA so readers render the lists;
//! issues without content get a plain-text fallback description.

use crate::config::FeedConfig;
use crate::models::IssueDescriptor;
use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::Write;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Format a date as an RFC 822 timestamp at noon GMT.
///
/// ```ignore
/// assert_eq!(rss_date(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()), "Thu, 02 Jan 2025 12:00:00 GMT");
/// ```
pub fn rss_date(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y 12:00:00 GMT").to_string()
}

/// Description used for items without extracted content.
pub fn fallback_description(date_text: &str) -> String {
    format!(
        "Weekly summary of the most edited Wikipedia articles and discussions for the week ending {}.",
        date_text
    )
}

/// Split markup into CDATA payloads so that no payload contains `]]>`.
fn cdata_sections(content: &str) -> Vec<String> {
    let parts: Vec<&str> = content.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut section = String::with_capacity(part.len() + 3);
            if i > 0 {
                section.push('>');
            }
            section.push_str(part);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}

fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_cdata_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    content: &str,
) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    for section in cdata_sections(content) {
        w.write_event(Event::CData(BytesCData::new(section.as_str())))?;
    }
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_item<W: Write>(w: &mut Writer<W>, issue: &IssueDescriptor) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new("item")))?;
    write_text_element(w, "title", &issue.title)?;
    write_text_element(w, "link", &issue.url)?;
    write_text_element(w, "guid", &issue.url)?;
    write_text_element(w, "pubDate", &rss_date(issue.date))?;
    match issue.content.fragment() {
        Some(fragment) => write_cdata_element(w, "description", fragment)?,
        None => write_text_element(w, "description", &fallback_description(&issue.date_text))?,
    }
    w.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}

/// Build the RSS document for `issues`.
///
/// # Arguments
///
/// * `issues` - Issues in feed order (newest first)
/// * `config` - Channel title, link, description and language
/// * `max_items` - Only the first `max_items` issues become items
///
/// # Returns
///
/// The complete document, starting with the XML declaration. Errors only if
/// the underlying writer fails, which does not happen for in-memory output.
pub fn build_feed(
    issues: &[IssueDescriptor],
    config: &FeedConfig,
    max_items: usize,
) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss_start = BytesStart::new("rss");
    rss_start.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss_start))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &config.title)?;
    write_text_element(&mut writer, "link", &config.link)?;
    write_text_element(&mut writer, "description", &config.description)?;
    write_text_element(&mut writer, "language", &config.language)?;

    if let Some(newest) = issues.first() {
        write_text_element(&mut writer, "lastBuildDate", &rss_date(newest.date))?;
    }

    for issue in issues.iter().take(max_items) {
        write_item(&mut writer, issue)?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// Write a feed document to `path`, creating parent directories as needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_feed(xml: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, xml).await?;
    info!(bytes = xml.len(), "Wrote RSS feed");
    Ok(())
}
