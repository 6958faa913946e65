// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::{
    env,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{debug, info, warn};

use crate::alleles::Allele;
use crate::config::FailurePolicy;
use crate::errors::EpiPredError;
use crate::ledger::{ClaimResult, OutputLedger};
use crate::naming::OutputName;
use crate::seq::fasta::validate_sequence_file;
use crate::seq::input::SequenceFile;

// Outcome of one predictor call. The output itself has already gone to the claimed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorStatus {
    pub code: Option<i32>,
    pub stderr: String,
}

impl PredictorStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can predict binding of the peptides in `input` to `allele`, writing its
/// tab-separated table to `output`.
pub trait Predictor {
    fn name(&self) -> &str;

    fn predict(
        &self,
        method: &str,
        allele: &str,
        input: &Path,
        output: File,
    ) -> Result<PredictorStatus, EpiPredError>;
}

// The IEDB command-line tool (or anything with the same calling convention:
// `<program> <method> <allele> <input-file>`, table on stdout).
pub struct ExternalPredictor {
    program: PathBuf,
    display_name: String,
}

impl ExternalPredictor {
    pub fn new<P: AsRef<Path>>(program: P) -> Self {
        let program = program.as_ref().to_path_buf();
        let display_name = program
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.display().to_string());
        ExternalPredictor {
            program,
            display_name,
        }
    }
}

impl Predictor for ExternalPredictor {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn predict(
        &self,
        method: &str,
        allele: &str,
        input: &Path,
        output: File,
    ) -> Result<PredictorStatus, EpiPredError> {
        let mut child = Command::new(&self.program)
            .arg(method)
            .arg(allele)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::from(output))
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                EpiPredError::Dependency(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;
        // stdout goes to a file, so draining stderr before waiting cannot deadlock. The child is
        // reaped even if reading its stderr fails.
        let mut stderr = Vec::new();
        let drained = match child.stderr.take() {
            Some(mut pipe) => pipe.read_to_end(&mut stderr).map(|_| ()),
            None => Ok(()),
        };
        let status = child.wait()?;
        drained?;
        Ok(PredictorStatus {
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }
}

/// Finds `program` the way a shell would: as given if it contains a path separator, otherwise
/// in the directories of `PATH`. Only executable regular files count.
pub fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|p| is_executable(p))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(md) => md.is_file() && md.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DriverSummary {
    pub invoked: usize,
    pub skipped: usize,
    pub failed: usize,
    // Pairs not attempted under the Skip policy: invalid input, or claimed by another run.
    pub rejected: usize,
}

pub struct PredictionDriver<'a> {
    method: String,
    ledger: &'a OutputLedger,
    on_error: FailurePolicy,
}

impl<'a> PredictionDriver<'a> {
    pub fn new(method: &str, ledger: &'a OutputLedger, on_error: FailurePolicy) -> Self {
        PredictionDriver {
            method: String::from(method),
            ledger,
            on_error,
        }
    }

    /// Runs the predictor on every (input, allele) pair whose output does not exist yet. Inputs
    /// are validated before each pair, including pairs that turn out to be done already.
    pub fn run(
        &self,
        inputs: &[SequenceFile],
        alleles: &[Allele],
        predictor: &dyn Predictor,
    ) -> Result<DriverSummary, EpiPredError> {
        let mut summary = DriverSummary::default();
        for allele in alleles {
            for input in inputs {
                match self.run_pair(input, allele, predictor, &mut summary) {
                    Ok(()) => {}
                    Err(e) if self.on_error == FailurePolicy::Skip && e.is_skippable() => {
                        warn!("{}", e);
                        match e {
                            EpiPredError::Predictor { .. } => summary.failed += 1,
                            _ => summary.rejected += 1,
                        }
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        info!(
            "{} predictions run, {} already present, {} failed, {} not attempted",
            summary.invoked, summary.skipped, summary.failed, summary.rejected
        );
        Ok(summary)
    }

    fn run_pair(
        &self,
        input: &SequenceFile,
        allele: &str,
        predictor: &dyn Predictor,
        summary: &mut DriverSummary,
    ) -> Result<(), EpiPredError> {
        let stats = validate_sequence_file(&input.path)?;
        debug!(
            "{}: {} records, {} residues",
            input.path.display(),
            stats.records,
            stats.residues
        );

        let name = OutputName::new(&input.strain, allele)?;
        let mut claim = match self.ledger.claim(&name)? {
            ClaimResult::Done => {
                debug!("{} already predicted, skipping", name);
                summary.skipped += 1;
                return Ok(());
            }
            ClaimResult::Busy(partial) => return Err(EpiPredError::Claimed(partial)),
            ClaimResult::Claimed(claim) => claim,
        };

        let Some(output) = claim.take_file() else {
            claim.abandon()?;
            return Err(EpiPredError::Config(format!("claim for {} has no file", name)));
        };
        debug!(
            "running {} {} {} {}",
            predictor.name(),
            self.method,
            allele,
            input.path.display()
        );
        summary.invoked += 1;
        let status = match predictor.predict(&self.method, allele, &input.path, output) {
            Ok(status) => status,
            Err(e) => {
                claim.abandon()?;
                return Err(e);
            }
        };
        if !status.success() {
            claim.abandon()?;
            return Err(EpiPredError::Predictor {
                program: String::from(predictor.name()),
                allele: String::from(allele),
                input: input.path.clone(),
                code: status.code,
                stderr: status.stderr,
            });
        }
        let path = claim.commit()?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}
