// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::EpiPredError;

// What a sequence file was found to contain. Only used for logging: validation is a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStats {
    pub records: usize,
    pub residues: usize,
}

/// Rejects a FastA-like file that has no '>' header line, or whose sequence lines are all empty
/// (header-only or empty file). Blank lines are ignored.
pub fn validate_sequence_file<P: AsRef<Path>>(path: P) -> Result<SequenceStats, EpiPredError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let stats = scan_sequences(BufReader::new(file))?;

    if stats.records == 0 {
        return Err(EpiPredError::Validation {
            path: path.to_path_buf(),
            reason: String::from("no '>' header line"),
        });
    }
    if stats.residues == 0 {
        return Err(EpiPredError::Validation {
            path: path.to_path_buf(),
            reason: String::from("no sequence content"),
        });
    }
    Ok(stats)
}

fn scan_sequences<R: BufRead>(reader: R) -> Result<SequenceStats, std::io::Error> {
    let mut stats = SequenceStats {
        records: 0,
        residues: 0,
    };
    for line in reader.lines() {
        let l = line?;
        let trimmed = l.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('>') {
            stats.records += 1;
        } else {
            stats.residues += trimmed.chars().count();
        }
    }
    Ok(stats)
}
