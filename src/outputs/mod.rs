//! Output generation for the feed document.
//!
//! # Submodules
//!
//! - [`rss`]: Serializes issues to RSS 2.0 and writes the document to disk
//!
//! # Output Structure
//!
//! ```text
//! feed.xml    # single RSS 2.0 document, path set by `output_path`
//! ```

pub mod rss;
