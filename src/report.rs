// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

//! Per-strain summary of all predictions in an output directory.
//!
//! The report is rebuilt from scratch each time: every file named `<strain>_<allele>.txt` is
//! parsed, its peptides are deduplicated, and the result is laid out as one row per strain with
//! a count column and a peptide-list column per allele:
//!
//! ```text
//! Strain  X_Allele  Y_Allele  X_Peptide  Y_Peptide
//! ```
//!
//! Alleles and strains are sorted, as are the peptides within a cell.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::{debug, info, warn};

use crate::config::{FailurePolicy, MissingCell};
use crate::errors::EpiPredError;
use crate::naming::OutputName;
use crate::results::read_results_file;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrainSummary {
    pub strain: String,
    // allele -> unique peptides
    pub peptides: BTreeMap<String, BTreeSet<String>>,
}

impl StrainSummary {
    pub fn count(&self, allele: &str) -> Option<usize> {
        self.peptides.get(allele).map(|p| p.len())
    }

    pub fn peptide_list(&self, allele: &str) -> Option<String> {
        self.peptides.get(allele).map(|p| p.iter().join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub alleles: Vec<String>,
    pub strains: Vec<StrainSummary>,
}

/// Lists the prediction output files of `dir`, sorted. Anything that does not follow the output
/// naming scheme (claims in progress, the report itself, ...) is left out.
pub fn list_output_files<P: AsRef<Path>>(
    dir: P,
) -> Result<Vec<(OutputName, PathBuf)>, EpiPredError> {
    let mut outputs = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        match OutputName::from_path(&path) {
            Some(name) => outputs.push((name, path)),
            None => debug!("ignoring {}", path.display()),
        }
    }
    outputs.sort();
    Ok(outputs)
}

pub fn aggregate<P: AsRef<Path>>(dir: P, on_error: FailurePolicy) -> Result<Report, EpiPredError> {
    let mut by_strain: BTreeMap<String, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    let mut alleles: BTreeSet<String> = BTreeSet::new();

    for (name, path) in list_output_files(dir)? {
        let records = match read_results_file(&path) {
            Ok(records) => records,
            Err(e) if on_error == FailurePolicy::Skip && e.is_skippable() => {
                warn!("{}", e);
                continue;
            }
            Err(e) => return Err(e),
        };
        let unique: BTreeSet<String> = records.into_iter().map(|r| r.peptide).collect();
        debug!("{}: {} unique peptides", name, unique.len());
        alleles.insert(name.allele.clone());
        by_strain
            .entry(name.strain)
            .or_default()
            .insert(name.allele, unique);
    }

    let strains = by_strain
        .into_iter()
        .map(|(strain, peptides)| StrainSummary { strain, peptides })
        .collect();
    Ok(Report {
        alleles: alleles.into_iter().collect(),
        strains,
    })
}

impl Report {
    pub fn header(&self) -> String {
        std::iter::once(String::from("Strain"))
            .chain(self.alleles.iter().map(|a| format!("{}_Allele", a)))
            .chain(self.alleles.iter().map(|a| format!("{}_Peptide", a)))
            .join("\t")
    }

    pub fn row(&self, summary: &StrainSummary, missing: MissingCell) -> String {
        let missing_count = match missing {
            MissingCell::Zero => String::from("0"),
            MissingCell::Blank => String::new(),
        };
        let counts = self.alleles.iter().map(|a| {
            summary
                .count(a)
                .map(|n| n.to_string())
                .unwrap_or_else(|| missing_count.clone())
        });
        let lists = self
            .alleles
            .iter()
            .map(|a| summary.peptide_list(a).unwrap_or_default());
        std::iter::once(summary.strain.clone())
            .chain(counts)
            .chain(lists)
            .join("\t")
    }

    pub fn write_tsv<W: Write>(&self, out: &mut W, missing: MissingCell) -> std::io::Result<()> {
        writeln!(out, "{}", self.header())?;
        for summary in &self.strains {
            writeln!(out, "{}", self.row(summary, missing))?;
        }
        Ok(())
    }

    // Overwrites any existing file at `path`.
    pub fn write_to_path(&self, path: &Path, missing: MissingCell) -> Result<(), EpiPredError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_tsv(&mut out, missing)?;
        out.flush()?;
        info!(
            "wrote report for {} strains x {} alleles to {}",
            self.strains.len(),
            self.alleles.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(strain: &str, cells: &[(&str, Vec<&str>)]) -> StrainSummary {
        StrainSummary {
            strain: String::from(strain),
            peptides: cells
                .iter()
                .map(|(a, peps)| {
                    let peps: BTreeSet<String> = peps.iter().map(|p| String::from(*p)).collect();
                    (String::from(*a), peps)
                })
                .collect(),
        }
    }

    fn render(report: &Report, missing: MissingCell) -> String {
        let mut buf: Vec<u8> = Vec::new();
        report.write_tsv(&mut buf, missing).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_width() {
        let report = Report {
            alleles: vec![String::from("X"), String::from("Y"), String::from("Z")],
            strains: Vec::new(),
        };
        assert_eq!(report.header().split('\t').count(), 1 + 2 * 3);
        assert_eq!(
            report.header(),
            "Strain\tX_Allele\tY_Allele\tZ_Allele\tX_Peptide\tY_Peptide\tZ_Peptide"
        );
    }

    #[test]
    fn test_row_layout() {
        let report = Report {
            alleles: vec![String::from("X"), String::from("Y")],
            strains: vec![summary("S1", &[("X", vec!["MKLV", "ABCD"]), ("Y", vec!["QQQQ"])])],
        };
        assert_eq!(
            report.row(&report.strains[0], MissingCell::Zero),
            "S1\t2\t1\tABCD,MKLV\tQQQQ"
        );
    }

    #[test]
    fn test_missing_cells() {
        let report = Report {
            alleles: vec![String::from("X"), String::from("Y")],
            strains: vec![summary("S1", &[("Y", vec!["QQQQ"])])],
        };
        assert_eq!(
            render(&report, MissingCell::Zero),
            "Strain\tX_Allele\tY_Allele\tX_Peptide\tY_Peptide\nS1\t0\t1\t\tQQQQ\n"
        );
        assert_eq!(
            render(&report, MissingCell::Blank),
            "Strain\tX_Allele\tY_Allele\tX_Peptide\tY_Peptide\nS1\t\t1\t\tQQQQ\n"
        );
    }

    #[test]
    fn test_aggregate_fixture_dir() {
        let report = aggregate("tests/data/predictions", FailurePolicy::FailFast)
            .expect("Test dir not found");
        assert_eq!(report.alleles, vec!["X"]);
        let a = &report.strains[0];
        let b = &report.strains[1];
        assert_eq!(a.strain, "StrainA");
        assert_eq!(a.count("X"), Some(2));
        assert_eq!(a.peptide_list("X").as_deref(), Some("ABCDEFGH,MKLVINGK"));
        assert_eq!(b.strain, "StrainB");
        assert_eq!(b.count("X"), Some(1));
        assert_eq!(b.peptide_list("X").as_deref(), Some("ABCDEFGH"));
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let report = aggregate(dir.path(), FailurePolicy::FailFast).unwrap();
        assert_eq!(render(&report, MissingCell::Zero), "Strain\n");
    }

    #[test]
    fn test_header_only_output_counts_zero() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("S1_X.txt"),
            "allele\tseq_num\tstart\tend\tpeptide\tconsensus_percentile_rank\n",
        )
        .unwrap();
        let report = aggregate(dir.path(), FailurePolicy::FailFast).unwrap();
        assert_eq!(report.strains[0].count("X"), Some(0));
        assert_eq!(report.row(&report.strains[0], MissingCell::Blank), "S1\t0\t");
    }

    #[test]
    fn test_bad_output_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("S1_X.txt"), "X\t1\t1\t8\tMKLVINGK\n").unwrap();
        fs::write(dir.path().join("S2_X.txt"), "X\t1\t1\t8\tMKLVINGK\t0.1\n").unwrap();

        let res = aggregate(dir.path(), FailurePolicy::FailFast);
        assert!(matches!(res, Err(EpiPredError::Parse { .. })));

        let report = aggregate(dir.path(), FailurePolicy::Skip).unwrap();
        assert_eq!(report.strains.len(), 1);
        assert_eq!(report.strains[0].strain, "S2");
    }
}
