// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

// Alleles are opaque to us: whatever the predictor accepts.
pub type Allele = String;

// One allele per line, in file order. Duplicates are kept.
pub fn read_allele_list<P: AsRef<Path>>(path: P) -> Result<Vec<Allele>, std::io::Error> {
    let allele_file = File::open(path)?;
    let reader = BufReader::new(allele_file);
    reader
        .lines()
        .map(|line| line.map(|l| String::from(l.trim_end())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_allele_list() {
        let alleles = read_allele_list("tests/data/alleles.txt").expect("Test file not found");
        assert_eq!(
            alleles,
            vec!["HLA-DRB1*01:01", "HLA-DRB1*03:01", "HLA-DRB1*01:01"]
        );
    }

    #[test]
    fn test_trailing_whitespace_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alleles");
        std::fs::write(&path, "A \r\nB\t\nC").unwrap();
        assert_eq!(read_allele_list(&path).unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_file() {
        let err = read_allele_list("tests/data/no-such-list.txt").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
