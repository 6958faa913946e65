// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

use std::process::ExitCode;

fn main() -> ExitCode {
    match epipred::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\nError!: {}\n", e);
            ExitCode::FAILURE
        }
    }
}
