// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::path::PathBuf;

use log::info;

use clap::{CommandFactory, Parser};

use crate::alleles::read_allele_list;
use crate::config::{
    find_epipred_config, EpiPredConfig, FailurePolicy, MissingCell, Overrides, Settings,
};
use crate::errors::EpiPredError;
use crate::ledger::OutputLedger;
use crate::predict::{resolve_program, ExternalPredictor, PredictionDriver};
use crate::report::aggregate;
use crate::seq::input::list_sequence_files;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    /// Directory holding one peptide (FastA) file per strain
    #[arg(short = 'p', long = "peptides", value_name = "DIR")]
    peptides: Option<PathBuf>,

    /// File with one allele per line
    #[arg(short = 'a', long = "allele", value_name = "FILE")]
    allele_file: Option<PathBuf>,

    /// Prediction method [default: consensus]
    #[arg(short, long)]
    method: Option<String>,

    /// Report file [default: report.txt]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    report: Option<PathBuf>,

    /// Directory for per-allele prediction files [default: predictions]
    #[arg(short = 'd', long = "outdir", value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Predictor executable [default: mhc_II_binding.py]
    #[arg(long)]
    predictor: Option<String>,

    /// Config file (default: .epipredconfig in $HOME or the current directory)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Abort on the first bad input, failed prediction or bad result file, or skip it
    #[arg(long = "on-error", value_enum)]
    on_error: Option<FailurePolicy>,

    /// Report cell contents for strain/allele pairs without predictions
    #[arg(long = "missing-cell", value_enum)]
    missing_cell: Option<MissingCell>,

    /// Only rebuild the report from existing prediction files
    #[arg(short = 'r', long = "report-only")]
    report_only: bool,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<EpiPredConfig, EpiPredError> {
    let path = match explicit {
        Some(path) => path.clone(),
        None => match find_epipred_config() {
            Some(path) => path,
            None => return Ok(EpiPredConfig::default()),
        },
    };
    info!("Reading config from {}", path.display());
    EpiPredConfig::from_file(&path)
}

fn usage_error(msg: &str) -> EpiPredError {
    let mut cmd = Cli::command();
    eprintln!("{}", cmd.render_help());
    EpiPredError::Config(String::from(msg))
}

pub fn run() -> Result<(), EpiPredError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let file_config = load_config(cli.config.as_ref())?;
    let settings = Settings::resolve(
        Overrides {
            predictor: cli.predictor,
            method: cli.method,
            outdir: cli.outdir,
            report: cli.report,
            on_error: cli.on_error,
            missing_cell: cli.missing_cell,
        },
        file_config,
    );
    info!("{:?}", settings);

    if !cli.report_only {
        let (Some(peptides), Some(allele_file)) = (&cli.peptides, &cli.allele_file) else {
            return Err(usage_error("A mandatory option is missing!"));
        };

        let program = resolve_program(&settings.predictor).ok_or_else(|| {
            EpiPredError::Dependency(format!(
                "MHC predictor '{}' is not installed (or not on PATH)",
                settings.predictor
            ))
        })?;
        info!("Using predictor {}", program.display());

        let alleles = read_allele_list(allele_file)?;
        info!("{} alleles read from {}", alleles.len(), allele_file.display());
        let inputs = list_sequence_files(peptides)?;
        info!("{} sequence files in {}", inputs.len(), peptides.display());

        let ledger = OutputLedger::new(&settings.outdir)?;
        let predictor = ExternalPredictor::new(program);
        let driver = PredictionDriver::new(&settings.method, &ledger, settings.on_error);
        driver.run(&inputs, &alleles, &predictor)?;
    }

    let report = aggregate(&settings.outdir, settings.on_error)?;
    report.write_to_path(&settings.report, settings.missing_cell)?;

    Ok(())
}
