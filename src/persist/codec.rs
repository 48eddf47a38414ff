//! Line codec
//!
//! Encoding and decoding of the dump format.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Result, SkipKvError};

/// Summary of a load, in the spirit of a recovery report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read from the input
    pub lines_read: usize,

    /// Lines that produced a new entry
    pub inserted: usize,

    /// Well-formed lines whose key was already present (first one wins)
    pub duplicates: usize,

    /// Lines skipped as malformed
    pub skipped: usize,
}

/// Render one entry as `<key><delimiter><value>` (no line terminator)
pub fn encode_line<K: Display, V: Display>(key: &K, value: &V, delimiter: &str) -> String {
    format!("{}{}{}", key, delimiter, value)
}

/// Parse one line, splitting at the first delimiter
///
/// `line_no` is 1-based and only used for the error.
pub fn decode_line<K, V>(line: &str, line_no: usize, delimiter: &str) -> Result<(K, V)>
where
    K: FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
{
    let malformed = |reason: String| SkipKvError::MalformedLine {
        line: line_no,
        reason,
    };

    let (raw_key, raw_value) = line
        .split_once(delimiter)
        .ok_or_else(|| malformed(format!("missing delimiter {:?}", delimiter)))?;

    if raw_key.is_empty() {
        return Err(malformed("empty key".to_string()));
    }
    if raw_value.is_empty() {
        return Err(malformed("empty value".to_string()));
    }

    let key = raw_key
        .parse::<K>()
        .map_err(|e| malformed(format!("bad key {:?}: {}", raw_key, e)))?;
    let value = raw_value
        .parse::<V>()
        .map_err(|e| malformed(format!("bad value: {}", e)))?;

    Ok((key, value))
}

/// Write entries one per line, in the order given; returns the line count
pub fn write_entries<'a, W, K, V, I>(writer: &mut W, entries: I, delimiter: &str) -> Result<usize>
where
    W: Write,
    K: Display + 'a,
    V: Display + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut written = 0;

    for (key, value) in entries {
        let key_text = key.to_string();
        if key_text.contains(delimiter) {
            tracing::warn!(
                "Key {:?} contains the delimiter; line {} will not reload intact",
                key_text,
                written + 1
            );
        }
        writeln!(writer, "{}", encode_line(&key_text, value, delimiter))?;
        written += 1;
    }

    writer.flush()?;
    Ok(written)
}

/// Read lines and hand each well-formed entry to `insert`
///
/// `insert` returns `true` when the entry was new. Malformed lines are
/// skipped; read failures are returned.
pub fn read_entries<R, K, V, F>(reader: R, delimiter: &str, mut insert: F) -> Result<LoadStats>
where
    R: BufRead,
    K: FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
    F: FnMut(K, V) -> bool,
{
    let mut stats = LoadStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        stats.lines_read += 1;

        match decode_line::<K, V>(&line, index + 1, delimiter) {
            Ok((key, value)) => {
                if insert(key, value) {
                    stats.inserted += 1;
                } else {
                    stats.duplicates += 1;
                }
            }
            Err(e) => {
                tracing::debug!("Skipping line: {}", e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
