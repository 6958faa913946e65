// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

//! Completion ledger for predictions, backed by the output directory.
//!
//! A (strain, allele) pair is done iff its final output file exists. Work on a pair is reserved
//! by atomically creating `<output>.part`; the predictor writes into that file, and the claim is
//! then either committed (renamed to the final name) or abandoned (removed). A run that dies
//! half-way therefore never leaves a final-named file behind, and two runs sharing a directory
//! cannot both compute the same pair.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::EpiPredError;
use crate::naming::OutputName;

pub const PARTIAL_SUFFIX: &str = "part";

pub struct OutputLedger {
    dir: PathBuf,
}

pub enum ClaimResult {
    Done,
    // Someone else holds the claim (or a previous run died holding it).
    Busy(PathBuf),
    Claimed(Claim),
}

pub struct Claim {
    partial: PathBuf,
    target: PathBuf,
    file: Option<File>,
}

impl OutputLedger {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, EpiPredError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(OutputLedger {
            dir: dir.to_path_buf(),
        })
    }

    pub fn output_path(&self, name: &OutputName) -> PathBuf {
        name.path_in(&self.dir)
    }

    pub fn is_complete(&self, name: &OutputName) -> bool {
        self.output_path(name).exists()
    }

    pub fn claim(&self, name: &OutputName) -> Result<ClaimResult, EpiPredError> {
        if self.is_complete(name) {
            return Ok(ClaimResult::Done);
        }
        let target = self.output_path(name);
        let partial = self
            .dir
            .join(format!("{}.{}", name.file_name(), PARTIAL_SUFFIX));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&partial)
        {
            Ok(file) => {
                debug!("claimed {}", partial.display());
                Ok(ClaimResult::Claimed(Claim {
                    partial,
                    target,
                    file: Some(file),
                }))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(ClaimResult::Busy(partial)),
            Err(e) => Err(EpiPredError::Io(e)),
        }
    }
}

impl Claim {
    // The handle to write the prediction into. Can only be taken once.
    pub fn take_file(&mut self) -> Option<File> {
        self.file.take()
    }

    // Publishes the prediction under its final name without clobbering one that appeared since
    // the claim (the existence check and the claim are two separate steps). Filesystems without
    // hard links fall back to a plain rename.
    pub fn commit(mut self) -> Result<PathBuf, EpiPredError> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        match fs::hard_link(&self.partial, &self.target) {
            Ok(()) => fs::remove_file(&self.partial)?,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{} appeared meanwhile, keeping it", self.target.display());
                fs::remove_file(&self.partial)?;
            }
            Err(_) => fs::rename(&self.partial, &self.target)?,
        }
        Ok(self.target.clone())
    }

    pub fn abandon(mut self) -> Result<(), EpiPredError> {
        self.file.take();
        match fs::remove_file(&self.partial) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(EpiPredError::Io(e)),
        }
    }
}
