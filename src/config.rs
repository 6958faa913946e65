// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use serde::Deserialize;

use crate::errors::EpiPredError;

pub const CONFIG_FILE_NAME: &str = ".epipredconfig";
pub const DEFAULT_PREDICTOR: &str = "mhc_II_binding.py";
pub const DEFAULT_METHOD: &str = "consensus";
pub const DEFAULT_OUTDIR: &str = "predictions";
pub const DEFAULT_REPORT: &str = "report.txt";

// What to do when one input, one predictor call, or one result file goes wrong.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    #[default]
    #[clap(name = "fail-fast")]
    FailFast,
    #[clap(name = "skip")]
    Skip,
}

// What to put in a report cell for a (strain, allele) pair that has no output file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MissingCell {
    #[default]
    #[clap(name = "zero")]
    Zero,
    #[clap(name = "blank")]
    Blank,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailurePolicy::FailFast => "fail-fast",
            FailurePolicy::Skip => "skip",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for MissingCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissingCell::Zero => "zero",
            MissingCell::Blank => "blank",
        };
        write!(f, "{}", s)
    }
}

/// Contents of an `.epipredconfig` file (JSON). Every key is optional; command-line options
/// take precedence over these.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EpiPredConfig {
    pub predictor: Option<String>,
    pub method: Option<String>,
    pub outdir: Option<PathBuf>,
    pub on_error: Option<FailurePolicy>,
    pub missing_cell: Option<MissingCell>,
}

impl EpiPredConfig {
    pub fn from_file(path: &Path) -> Result<Self, EpiPredError> {
        let text = fs::read_to_string(path)?;
        EpiPredConfig::from_json(&text).map_err(|e| {
            EpiPredError::Config(format!("Error reading {}: {}", path.display(), e))
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

pub fn find_epipred_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

// Effective settings for one run, after merging the command line, the config file and the
// built-in defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub predictor: String,
    pub method: String,
    pub outdir: PathBuf,
    pub report: PathBuf,
    pub on_error: FailurePolicy,
    pub missing_cell: MissingCell,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub predictor: Option<String>,
    pub method: Option<String>,
    pub outdir: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub on_error: Option<FailurePolicy>,
    pub missing_cell: Option<MissingCell>,
}

impl Settings {
    pub fn resolve(cli: Overrides, file: EpiPredConfig) -> Self {
        Settings {
            predictor: cli
                .predictor
                .or(file.predictor)
                .unwrap_or_else(|| String::from(DEFAULT_PREDICTOR)),
            method: cli
                .method
                .or(file.method)
                .unwrap_or_else(|| String::from(DEFAULT_METHOD)),
            outdir: cli
                .outdir
                .or(file.outdir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTDIR)),
            report: cli.report.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT)),
            on_error: cli.on_error.or(file.on_error).unwrap_or_default(),
            missing_cell: cli.missing_cell.or(file.missing_cell).unwrap_or_default(),
        }
    }
}
