// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The epipred authors

pub mod fasta;
pub mod input;
