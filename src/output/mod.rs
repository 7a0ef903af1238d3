//! Output module for writing the page corpus
//!
//! This module handles:
//! - Serializing page records as a JSON array
//! - Rendering crawl statistics for the command line

pub mod stats;

pub use stats::{format_statistics, print_statistics};

use crate::crawler::PageRecord;
use crate::CrawlError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as a pretty-printed JSON array
///
/// # Arguments
///
/// * `records` - Page records in crawl order
/// * `writer` - Destination; flushed before returning
///
/// # Returns
///
/// * `Ok(())` - All records written
/// * `Err(CrawlError)` - Serialization or IO failure
pub fn write_json<W: Write>(records: &[PageRecord], mut writer: W) -> Result<(), CrawlError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes records to `path`, creating or truncating the file
pub fn write_json_file(records: &[PageRecord], path: &Path) -> Result<(), CrawlError> {
    let file = File::create(path)?;
    write_json(records, BufWriter::new(file))?;
    tracing::info!("Wrote {} pages to {}", records.len(), path.display());
    Ok(())
}
