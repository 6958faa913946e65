// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

//! Prediction output file names.
//!
//! Each (strain, allele) prediction is stored as `<strain>_<allele>.txt`. The driver writes these
//! names and the report reads them back, so both go through [`OutputName`]. Strains never contain
//! `_` (see `seq::input::strain_of`), which makes the first `_` an unambiguous boundary even when
//! the allele itself contains underscores.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::EpiPredError;

pub const OUTPUT_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputName {
    pub strain: String,
    pub allele: String,
}

fn output_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([^_./\\]+)_([^/\\]+)\.txt$").expect("valid regex"))
}

impl OutputName {
    pub fn new(strain: &str, allele: &str) -> Result<Self, EpiPredError> {
        if strain.is_empty() || strain.contains(|c: char| matches!(c, '_' | '.' | '/' | '\\')) {
            return Err(EpiPredError::Config(format!(
                "Strain name '{}' cannot be used in an output file name",
                strain
            )));
        }
        if allele.is_empty() || allele.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
            return Err(EpiPredError::Config(format!(
                "Allele '{}' cannot be used in an output file name",
                allele
            )));
        }
        Ok(OutputName {
            strain: String::from(strain),
            allele: String::from(allele),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}.{}", self.strain, self.allele, OUTPUT_EXTENSION)
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Recovers strain and allele from a bare file name, or None if the name does not follow the
    /// output naming scheme.
    pub fn parse(fname: &str) -> Option<Self> {
        let caps = output_name_re().captures(fname)?;
        Some(OutputName {
            strain: String::from(&caps[1]),
            allele: String::from(&caps[2]),
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|s| s.to_str())
            .and_then(OutputName::parse)
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.strain, self.allele)
    }
}
