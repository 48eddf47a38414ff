//! Persistence Module
//!
//! Plain-text dump of the index, replayed through insert on load.
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────┐
//! │ <key><delimiter><value>\n    │  lowest key
//! │ <key><delimiter><value>\n    │
//! │ ...                          │  ascending key order
//! └──────────────────────────────┘
//! ```
//!
//! No header, checksum or escaping. A line splits at the first delimiter, so
//! values may contain it but keys may not. Lines without a delimiter, with an
//! empty side, or that fail to parse are skipped. Since load goes through
//! insert, the first occurrence of a repeated key wins.

mod codec;

pub use codec::{decode_line, encode_line, read_entries, write_entries, LoadStats};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::Result;

/// Create (or truncate) a dump file, creating its parent directory if needed
pub fn create_dump_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

/// Open an existing dump file for reading
pub fn open_dump_file(path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}
