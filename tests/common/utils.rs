// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::{
    cell::Cell,
    collections::BTreeSet,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use epipred::{
    errors::EpiPredError,
    predict::{Predictor, PredictorStatus},
};

// Writes a small prediction table whose peptides depend on the allele, and counts calls.
#[allow(dead_code)]
pub struct CountingPredictor {
    pub calls: Cell<usize>,
}

#[allow(dead_code)]
impl CountingPredictor {
    pub fn new() -> Self {
        CountingPredictor { calls: Cell::new(0) }
    }
}

impl Predictor for CountingPredictor {
    fn name(&self) -> &str {
        "counting"
    }

    fn predict(
        &self,
        _method: &str,
        allele: &str,
        input: &Path,
        mut output: File,
    ) -> Result<PredictorStatus, EpiPredError> {
        self.calls.set(self.calls.get() + 1);
        writeln!(output, "allele\tseq_num\tstart\tend\tpeptide\tconsensus_percentile_rank")?;
        writeln!(output, "{}\t1\t1\t8\tMKLVINGK\t0.42", allele)?;
        writeln!(output, "{}\t1\t1\t8\tMKLVINGK\t5.0", allele)?;
        if input.to_string_lossy().contains("StrainA") {
            writeln!(output, "{}\t2\t1\t8\tABCDEFGH\t1.25", allele)?;
        }
        Ok(PredictorStatus {
            code: Some(0),
            stderr: String::new(),
        })
    }
}

// A scratch output directory, removed when dropped.
#[allow(dead_code)]
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("creating scratch dir")
}

#[allow(dead_code)]
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("reading dir")
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect()
}

// A stand-in for the IEDB tool: logs each call to `<dir>/calls.log`, prints a table for the
// allele it was given, and fails for allele "BAD". For allele "NOISY" it also writes bytes that
// are not UTF-8 to stderr.
#[cfg(unix)]
#[allow(dead_code)]
pub fn fake_predictor_script(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("calls.log");
    let script = dir.join("fake_binding.sh");
    let body = format!(
        r#"#!/bin/sh
echo "$1 $2 $3" >> "{log}"
if [ "$2" = "BAD" ]; then
    echo "unknown allele $2" >&2
    exit 3
fi
if [ "$2" = "NOISY" ]; then
    printf '\377\376 warning\n' >&2
fi
printf 'allele\tseq_num\tstart\tend\tpeptide\tconsensus_percentile_rank\n'
printf '%s\t1\t1\t8\tMKLVINGK\t0.42\n' "$2"
printf '%s\t1\t2\t9\tKLVINGKT\t17.9\n' "$2"
"#,
        log = log.display()
    );
    fs::write(&script, body).expect("writing script");
    let mut perms = fs::metadata(&script).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod script");
    script
}

#[cfg(unix)]
#[allow(dead_code)]
pub fn logged_calls(dir: &Path) -> Vec<String> {
    match fs::read_to_string(dir.join("calls.log")) {
        Ok(text) => text.lines().map(String::from).collect(),
        Err(_) => Vec::new(),
    }
}
