//! # Checkpoint — Resumable Range Sweep State
//!
//! The exhaustive range sweep can run for hours. After every block it saves
//! how far it got, so an interrupted run resumes instead of starting over.
//!
//! ## Atomic Writes
//!
//! Checkpoint files are written to a `.tmp` sibling and then renamed over the
//! target, so a crash mid-write never leaves a truncated file behind.
//!
//! ## Integrity
//!
//! The JSON payload is wrapped in an envelope holding its SHA-256 digest. A
//! file whose digest does not match is skipped and the next older generation
//! (up to 3 kept) is tried instead.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::primality::{AuxCheck, RingCheck};

/// Number of backup generations to keep.
const GENERATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Checkpoint {
    /// Odd candidates in `[start, end)` up to and including `last_n` are done.
    Range {
        last_n: u64,
        start: u64,
        end: u64,
        aux_check: AuxCheck,
        ring_check: RingCheck,
        tested: u64,
        mismatches: u64,
    },
}

/// Wrapper that includes a SHA-256 checksum for integrity verification.
#[derive(Serialize, Deserialize)]
struct CheckpointEnvelope {
    checksum: String,
    data: serde_json::Value,
}

fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Path for generation `gen` (0 = current, 1 = `.1`, ...).
fn generation_path(base: &Path, gen: usize) -> PathBuf {
    if gen == 0 {
        base.to_path_buf()
    } else {
        let mut p = base.as_os_str().to_os_string();
        p.push(format!(".{}", gen));
        PathBuf::from(p)
    }
}

/// Save a checkpoint, rotating current → `.1` → `.2`.
pub fn save(path: &Path, checkpoint: &Checkpoint) -> Result<()> {
    for gen in (1..GENERATIONS).rev() {
        let src = generation_path(path, gen - 1);
        let dst = generation_path(path, gen);
        if src.exists() {
            let _ = fs::rename(&src, &dst);
        }
    }

    let data = serde_json::to_value(checkpoint)?;
    let data_str = serde_json::to_string_pretty(&data)?;
    let checksum = sha256_hex(&data_str);

    let envelope = CheckpointEnvelope { checksum, data };
    let json = serde_json::to_string_pretty(&envelope)?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json)?;
    fs::rename(&tmp, path)?;

    Ok(())
}

/// Load the newest valid checkpoint, falling back to older generations.
pub fn load(path: &Path) -> Option<Checkpoint> {
    for gen in 0..GENERATIONS {
        let p = generation_path(path, gen);
        if let Some(cp) = load_single(&p) {
            if gen > 0 {
                warn!(generation = gen, path = %p.display(), "recovered checkpoint from older generation");
            }
            return Some(cp);
        }
    }
    None
}

fn load_single(path: &Path) -> Option<Checkpoint> {
    let raw = fs::read_to_string(path).ok()?;
    let envelope: CheckpointEnvelope = serde_json::from_str(&raw).ok()?;

    let data_str = serde_json::to_string_pretty(&envelope.data).ok()?;
    let expected = sha256_hex(&data_str);
    if expected != envelope.checksum {
        warn!(
            path = %path.display(),
            expected = &expected[..12],
            found = &envelope.checksum[..12.min(envelope.checksum.len())],
            "checkpoint integrity check failed"
        );
        return None;
    }

    serde_json::from_value(envelope.data).ok()
}

/// Remove the current checkpoint, all generations and any stray `.tmp`.
pub fn clear(path: &Path) {
    for gen in 0..GENERATIONS {
        let _ = fs::remove_file(generation_path(path, gen));
    }
    let _ = fs::remove_file(path.with_extension("tmp"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn range(last_n: u64) -> Checkpoint {
        Checkpoint::Range {
            last_n,
            start: 5,
            end: 1_000_001,
            aux_check: AuxCheck::Power,
            ring_check: RingCheck::Eval,
            tested: last_n / 2,
            mismatches: 0,
        }
    }

    fn last_n_of(cp: &Checkpoint) -> u64 {
        match cp {
            Checkpoint::Range { last_n, .. } => *last_n,
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        let cp = Checkpoint::Range {
            last_n: 4241,
            start: 5,
            end: 10_000,
            aux_check: AuxCheck::Gcd,
            ring_check: RingCheck::Coefficients,
            tested: 2119,
            mismatches: 1,
        };
        save(&path, &cp).unwrap();
        assert_eq!(load(&path), Some(cp));
    }

    #[test]
    fn rotation_keeps_generations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        for n in [101u64, 201, 301] {
            save(&path, &range(n)).unwrap();
        }

        assert!(path.exists());
        assert!(generation_path(&path, 1).exists());
        assert!(generation_path(&path, 2).exists());
        assert_eq!(last_n_of(&load_single(&path).unwrap()), 301);
        assert_eq!(last_n_of(&load_single(&generation_path(&path, 1)).unwrap()), 201);
        assert_eq!(last_n_of(&load_single(&generation_path(&path, 2)).unwrap()), 101);
    }

    #[test]
    fn fallback_on_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        save(&path, &range(1001)).unwrap();
        save(&path, &range(2001)).unwrap();

        {
            let mut f = fs::File::create(&path).unwrap();
            f.write_all(b"corrupted data!!!").unwrap();
        }

        assert_eq!(last_n_of(&load(&path).unwrap()), 1001);
    }

    #[test]
    fn checksum_detects_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        save(&path, &range(4243)).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        fs::write(&path, raw.replace("4243", "9999")).unwrap();

        assert!(load_single(&path).is_none());
    }

    #[test]
    fn payload_without_check_or_counter_fields_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        // valid checksum, but only the range bounds
        let data = serde_json::json!({"type": "Range", "last_n": 77, "start": 5, "end": 100});
        let data_str = serde_json::to_string_pretty(&data).unwrap();
        let envelope = serde_json::json!({"checksum": sha256_hex(&data_str), "data": data});
        fs::write(&path, serde_json::to_string_pretty(&envelope).unwrap()).unwrap();

        assert!(load(&path).is_none());
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.checkpoint")).is_none());
    }

    #[test]
    fn clear_removes_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("range.checkpoint");

        for n in 0..4 {
            save(&path, &range(n * 2 + 1)).unwrap();
        }
        clear(&path);

        assert!(!path.exists());
        assert!(!generation_path(&path, 1).exists());
        assert!(!generation_path(&path, 2).exists());
    }
}
