// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum EpiPredError {
    Io(io::Error),
    Config(String),
    Dependency(String),
    Validation {
        path: PathBuf,
        reason: String,
    },
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    Predictor {
        program: String,
        allele: String,
        input: PathBuf,
        code: Option<i32>,
        stderr: String,
    },
    // A `.part` claim left by another run, or by one that died.
    Claimed(PathBuf),
}

// These allow conversion to EpiPredError, required for run() to return Result<()> and for '?' to
// work.

impl From<io::Error> for EpiPredError {
    fn from(e: io::Error) -> Self {
        EpiPredError::Io(e)
    }
}

impl EpiPredError {
    // Errors that the Skip policy may step over. Anything else always aborts the run.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            EpiPredError::Validation { .. }
                | EpiPredError::Parse { .. }
                | EpiPredError::Predictor { .. }
                | EpiPredError::Claimed(_)
        )
    }
}

impl fmt::Display for EpiPredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpiPredError::Io(e) => write!(f, "I/O error: {}", e),
            EpiPredError::Config(msg) => write!(f, "Configuration error: {}", msg),
            EpiPredError::Dependency(msg) => write!(f, "Dependency error: {}", msg),
            EpiPredError::Claimed(partial) => write!(
                f,
                "{} is held by another run (remove it if no run is using it)",
                partial.display()
            ),
            EpiPredError::Validation { path, reason } => {
                write!(f, "Invalid sequence file {}: {}", path.display(), reason)
            }
            EpiPredError::Parse { path, line, reason } => {
                write!(f, "Parse error in {}, l. {}: {}", path.display(), line, reason)
            }
            EpiPredError::Predictor {
                program,
                allele,
                input,
                code,
                stderr,
            } => {
                let status = match code {
                    Some(c) => format!("exit status {}", c),
                    None => String::from("terminated by signal"),
                };
                write!(
                    f,
                    "{} failed on {} with allele {} ({})",
                    program,
                    input.display(),
                    allele,
                    status
                )?;
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for EpiPredError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpiPredError::Io(e) => Some(e),
            _ => None,
        }
    }
}
