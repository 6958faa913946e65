// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::EpiPredError;

pub const HEADER_PREFIX: &str = "allele";
const NUM_FIELDS: usize = 6;

// One data line of predictor output.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub allele: String,
    pub seq_num: String,
    pub start: String,
    pub end: String,
    pub peptide: String,
    pub rank: f64,
}

/// Parses predictor output: a header line starting with "allele", then tab-separated lines of
/// allele, sequence number, start, end, peptide and consensus rank. Records come back in file
/// order; no rank cutoff is applied. Columns past the sixth are ignored.
pub fn parse_results<R: BufRead>(
    reader: R,
    source: &Path,
) -> Result<Vec<PredictionRecord>, EpiPredError> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let l = line?;
        let trimmed = l.trim_end();
        if trimmed.is_empty() || trimmed.starts_with(HEADER_PREFIX) {
            continue;
        }
        let parse_err = |reason: String| EpiPredError::Parse {
            path: source.to_path_buf(),
            line: idx + 1,
            reason,
        };
        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() < NUM_FIELDS {
            return Err(parse_err(format!(
                "expected {} tab-separated fields, found {}",
                NUM_FIELDS,
                fields.len()
            )));
        }
        let rank: f64 = fields[5]
            .trim()
            .parse()
            .map_err(|_| parse_err(format!("consensus rank '{}' is not a number", fields[5])))?;
        records.push(PredictionRecord {
            allele: String::from(fields[0]),
            seq_num: String::from(fields[1]),
            start: String::from(fields[2]),
            end: String::from(fields[3]),
            peptide: String::from(fields[4]),
            rank,
        });
    }
    Ok(records)
}

pub fn read_results_file<P: AsRef<Path>>(path: P) -> Result<Vec<PredictionRecord>, EpiPredError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse_results(BufReader::new(file), path)
}
