// Copyright 2026 Marketgrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run configuration, built once from the CLI surface before traversal starts
//! and immutable for the lifetime of one run.

use clap::ValueEnum;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Results-per-page tiers offered by the remote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageSize {
    /// 10 results per page.
    Ten,
    /// 25 results per page.
    TwentyFive,
    /// 50 results per page.
    Fifty,
}

impl PageSize {
    /// Number of result rows one page renders at this setting.
    pub fn rows(self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
        }
    }

    /// The option value the listing's page-size `<select>` expects.
    pub fn form_value(self) -> &'static str {
        match self {
            Self::Ten => "10",
            Self::TwentyFive => "25",
            Self::Fifty => "50",
        }
    }
}

/// Sort orders offered by the remote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    /// Keyword relevance (the listing's default).
    Relevance,
    /// The marketplace's gravity score.
    Gravity,
    /// Overall popularity.
    Popularity,
}

impl SortField {
    /// The option value the listing's sort `<select>` expects.
    pub fn form_value(self) -> &'static str {
        match self {
            Self::Relevance => "RELEVANCE",
            Self::Gravity => "GRAVITY",
            Self::Popularity => "POPULARITY",
        }
    }
}

/// Pacing policy applied before each page advance.
///
/// Parsed from a single flag value: `"800"` is a fixed 800ms delay,
/// `"400..1500"` draws uniformly from the inclusive range per advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    /// Constant delay in milliseconds.
    Fixed(u64),
    /// Uniform draw from `[min, max]` milliseconds, independent per call.
    Random { min: u64, max: u64 },
}

impl FromStr for DelayPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((lo, hi)) = s.split_once("..") {
            let min: u64 = lo
                .trim()
                .parse()
                .map_err(|_| format!("invalid delay range start: {lo:?}"))?;
            let max: u64 = hi
                .trim()
                .parse()
                .map_err(|_| format!("invalid delay range end: {hi:?}"))?;
            if min > max {
                return Err(format!("delay range is inverted: {min} > {max}"));
            }
            Ok(Self::Random { min, max })
        } else {
            let ms: u64 = s
                .trim()
                .parse()
                .map_err(|_| format!("invalid fixed delay: {s:?}"))?;
            Ok(Self::Fixed(ms))
        }
    }
}

impl std::fmt::Display for DelayPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(ms) => write!(f, "{ms}"),
            Self::Random { min, max } => write!(f, "{min}..{max}"),
        }
    }
}

/// Everything one harvest run needs, captured before the traversal starts.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// The marketplace listing URL.
    pub url: Url,
    /// Search keyword filter. Empty means "no filter" — still submitted,
    /// which lands the listing on its unfiltered first page.
    pub search_keywords: String,
    /// Results-per-page setting.
    pub page_size: PageSize,
    /// Sort order applied before extraction.
    pub sort_field: SortField,
    /// Pacing policy for page advances.
    pub delay: DelayPolicy,
    /// Run the browser headless.
    pub headless: bool,
    /// Gzip the output artifact.
    pub compress: bool,
    /// Directory the artifact is written under.
    pub output_dir: PathBuf,
    /// Upper bound for each individual wait (navigation, stabilization).
    pub wait_timeout: Duration,
}
