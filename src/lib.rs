// Copyright 2026 Marketgrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Marketgrab — unattended batch extraction of paginated marketplace listings.
//!
//! Drives a headless browser through a dynamically rendered listing: applies
//! search/sort configuration, iterates every page with termination detection
//! and pacing, reconstructs records from the interleaved row fragments, and
//! writes one date-named artifact per run.

pub mod artifact;
pub mod assemble;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod listing;
pub mod pacing;
pub mod session;
pub mod traverse;

#[cfg(test)]
pub(crate) mod testkit;
