// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

// One input sequence file per strain. The strain name is the file name up to the first '_' or
// '.', so it never contains the output name delimiter.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::EpiPredError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFile {
    pub path: PathBuf,
    pub strain: String,
}

impl SequenceFile {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, EpiPredError> {
        let path = path.as_ref();
        let fname = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                EpiPredError::Config(format!("Not a usable file name: {}", path.display()))
            })?;
        let strain = strain_of(fname);
        if strain.is_empty() {
            return Err(EpiPredError::Config(format!(
                "Cannot derive a strain name from {}",
                fname
            )));
        }
        Ok(SequenceFile {
            path: path.to_path_buf(),
            strain: String::from(strain),
        })
    }
}

pub fn strain_of(fname: &str) -> &str {
    match fname.find(|c: char| c == '_' || c == '.') {
        Some(idx) => &fname[..idx],
        None => fname,
    }
}

/// Lists the sequence files of a directory, sorted by path. Hidden files and anything that is
/// not a regular file are left out. Two files yielding the same strain are an error, as their
/// predictions would land in the same output files.
pub fn list_sequence_files<P: AsRef<Path>>(dir: P) -> Result<Vec<SequenceFile>, EpiPredError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let hidden = entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();

    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut result = Vec::with_capacity(paths.len());
    for path in paths {
        let seq_file = SequenceFile::from_path(&path)?;
        if let Some(prev) = seen.insert(seq_file.strain.clone(), path.clone()) {
            return Err(EpiPredError::Config(format!(
                "{} and {} both map to strain {}",
                prev.display(),
                path.display(),
                seq_file.strain
            )));
        }
        result.push(seq_file);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_of() {
        assert_eq!(strain_of("StrainA.fasta"), "StrainA");
        assert_eq!(strain_of("StrainA_batch2.fa"), "StrainA");
        assert_eq!(strain_of("H37Rv"), "H37Rv");
        assert_eq!(strain_of(".hidden"), "");
    }

    #[test]
    fn test_from_path() {
        let sf = SequenceFile::from_path("some/dir/Erdman.pep").unwrap();
        assert_eq!(sf.strain, "Erdman");
        assert_eq!(sf.path, PathBuf::from("some/dir/Erdman.pep"));
    }

    #[test]
    fn test_list_sequence_files() {
        let files = list_sequence_files("tests/data/peptides").expect("Test dir not found");
        let strains: Vec<&str> = files.iter().map(|f| f.strain.as_str()).collect();
        assert_eq!(strains, vec!["StrainA", "StrainB"]);
    }

    #[test]
    fn test_duplicate_strain_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("X.fasta"), ">a\nMK\n").unwrap();
        fs::write(dir.path().join("X_2.fasta"), ">a\nMK\n").unwrap();
        let res = list_sequence_files(dir.path());
        assert!(matches!(res, Err(EpiPredError::Config(_))));
    }
}
