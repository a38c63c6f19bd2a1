//! Zip assembly for batch screenshot responses
//!
//! A pure, synchronous transformation: ordered (name, bytes) pairs in, one
//! in-memory zip buffer out. Entry names are derived deterministically from
//! the source URL and its 1-based batch position, so two URLs that sanitize
//! to the same text still produce distinct files.

use crate::CaptureError;
use std::io::{Cursor, Write};
use url::Url;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Longest sanitized URL fragment kept in an entry name.
const MAX_NAME_LEN: usize = 50;

/// A named file destined for the archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Derive the archive file name for a capture.
///
/// Non-alphanumeric characters become underscores, letters are lowercased,
/// and the result is truncated to 50 characters before the `.png` suffix.
/// `index` is the capture's zero-based position; the name carries it 1-based.
pub fn entry_name(index: usize, url: &Url) -> String {
    let safe: String = url
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();

    format!("screenshot_{}_{}.png", index + 1, safe)
}

/// Pack the entries into a single zip buffer, preserving their order.
pub fn pack(entries: &[ArchiveEntry]) -> Result<Vec<u8>, CaptureError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.data)?;
    }

    Ok(writer.finish()?.into_inner())
}
