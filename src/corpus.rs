//! # Corpus — Integer List Files
//!
//! Reads candidate lists (known primes, known pseudoprimes) stored as plain
//! text: one decimal integer per line, surrounding whitespace ignored, blank
//! lines skipped. A line that does not parse is an error naming the file and
//! the 1-based line number.

use anyhow::{Context, Result};
use rug::Integer;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse integers from any buffered reader. `count > 0` caps how many are
/// returned; `0` reads everything.
pub fn parse_integers<R: BufRead>(reader: R, count: usize) -> Result<Vec<Integer>> {
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        if count > 0 && values.len() >= count {
            break;
        }
        let line = line.with_context(|| format!("reading line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = Integer::parse(trimmed).map(Integer::from).map_err(|e| {
            anyhow::anyhow!("line {}: invalid integer '{}': {}", idx + 1, trimmed, e)
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Read integers from `path`; see [`parse_integers`].
pub fn read_integers(path: &Path, count: usize) -> Result<Vec<Integer>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_integers(BufReader::new(file), count)
        .with_context(|| format!("parsing {}", path.display()))
}
