pub mod alleles;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod naming;
pub mod predict;
pub mod report;
pub mod results;
mod runner;
pub mod seq;

use crate::errors::EpiPredError;

pub fn run() -> Result<(), EpiPredError> {
    runner::run()
}
