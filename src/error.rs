//! Error taxonomy for a harvest run.
//!
//! Every variant here is terminal for the run: the engine does not retry a
//! whole traversal. Transient network hiccups are absorbed by the browser's
//! own wait/timeout semantics, not re-implemented here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the traversal core and the artifact writer.
#[derive(Debug, Error)]
pub enum Error {
    /// The browser failed to reach the listing or a required post-navigation
    /// state within its wait condition.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A page rendered a fragment count that is not a multiple of three.
    /// Signals a layout/selector mismatch; never silently truncated.
    #[error("malformed page: {count} row fragments is not a multiple of 3")]
    MalformedPage { count: usize },

    /// The current-page indicator failed to change after an advance action
    /// within the bounded retry budget.
    #[error("pagination stalled on page {page} after {attempts} advance checks")]
    StagnantPagination { page: u32, attempts: u32 },

    /// The artifact could not be persisted.
    #[error("failed to write artifact at {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other failure inside the browser driver.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
