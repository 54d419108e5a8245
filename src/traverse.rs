// Copyright 2026 Marketgrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! The traversal engine: configure the listing, then iterate pages until
//! exhaustion.
//!
//! One state machine drives the run: `Configuring -> Extracting ->
//! Paginating -> {Extracting | Done}`. Extraction always happens before the
//! termination probe, and the termination probe always happens before any
//! pacing delay — a page that cannot be advanced past has already been
//! extracted by the time that is known.

use crate::assemble::Record;
use crate::config::ExtractionConfig;
use crate::driver::{BrowserDriver, PollMode};
use crate::error::{Error, Result};
use crate::extract::PageExtractor;
use crate::listing;
use crate::pacing::RateLimiter;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Bounded retry budget for the advance-confirmation poll.
const ADVANCE_CHECKS: u32 = 10;
const ADVANCE_POLL: Duration = Duration::from_millis(250);

/// Where the engine is in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraversalState {
    Configuring,
    Extracting,
    Paginating,
    Done,
}

/// Pagination progress, mutated once per traversal iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    /// Derived from the next-control probe, never stored independently of it.
    pub has_more: bool,
}

/// Raw pagination affordance as the page reports it.
#[derive(Debug, Deserialize)]
struct PageIndicator {
    current: Option<u32>,
    total: Option<u32>,
    #[serde(default)]
    summary: String,
}

/// Drives the listing through configuration and page-by-page extraction.
pub struct TraversalEngine<'a> {
    driver: &'a dyn BrowserDriver,
    config: &'a ExtractionConfig,
    limiter: RateLimiter,
    summary_pattern: Regex,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(driver: &'a dyn BrowserDriver, config: &'a ExtractionConfig) -> Self {
        Self {
            driver,
            config,
            limiter: RateLimiter::new(config.delay),
            summary_pattern: Regex::new(r"(?i)page\s+(\d+)\s+of\s+(\d+)")
                .expect("summary pattern is valid"),
        }
    }

    /// Run the traversal to exhaustion and return every record in strict
    /// page-then-row order.
    pub async fn run(&self) -> Result<Vec<Record>> {
        let extractor = PageExtractor::new(self.driver);
        let mut records: Vec<Record> = Vec::new();
        let mut pagination = PaginationState {
            current_page: 1,
            total_pages: 1,
            has_more: false,
        };
        // Set once an advance lands on the final page; that page still gets
        // one extraction cycle before the run finishes.
        let mut on_final_page = false;

        let mut state = TraversalState::Configuring;
        loop {
            state = match state {
                TraversalState::Configuring => {
                    self.configure().await?;
                    pagination = self.read_pagination().await?;
                    info!(
                        total_pages = pagination.total_pages,
                        "listing configured"
                    );
                    TraversalState::Extracting
                }

                TraversalState::Extracting => {
                    let page_records = extractor.extract_current_page().await?;
                    info!(
                        page = pagination.current_page,
                        records = page_records.len(),
                        "page extracted"
                    );
                    records.extend(page_records);
                    if on_final_page {
                        TraversalState::Done
                    } else {
                        TraversalState::Paginating
                    }
                }

                TraversalState::Paginating => {
                    pagination.has_more = self.has_next_control().await?;
                    if !pagination.has_more {
                        TraversalState::Done
                    } else {
                        self.limiter.pause().await;
                        let landed = self.advance(pagination.current_page).await?;
                        pagination.current_page = landed;
                        if landed >= pagination.total_pages {
                            on_final_page = true;
                        }
                        TraversalState::Extracting
                    }
                }

                TraversalState::Done => {
                    info!(
                        records = records.len(),
                        pages = pagination.current_page,
                        "traversal complete"
                    );
                    return Ok(records);
                }
            };
        }
    }

    /// Apply search filter, page size, and sort order, waiting for the
    /// rendering to settle after each change.
    async fn configure(&self) -> Result<()> {
        let d = self.driver;

        // Keyword submission is type-then-Enter; an empty keyword still
        // submits and lands the unfiltered listing.
        d.type_text(listing::SEARCH_INPUT, &self.config.search_keywords)
            .await?;
        d.press_key(listing::SEARCH_INPUT, "Enter").await?;
        d.wait_for_navigation()
            .await
            .map_err(|e| Error::Navigation(format!("{e:#}")))?;

        d.select_option(listing::PAGE_SIZE_SELECT, self.config.page_size.form_value())
            .await?;
        self.wait_for_stabilization().await?;

        d.select_option(listing::SORT_FIELD_SELECT, self.config.sort_field.form_value())
            .await?;
        self.wait_for_stabilization().await?;

        Ok(())
    }

    /// Wait until the rendered row-group count matches the count implied by
    /// the page-size setting.
    async fn wait_for_stabilization(&self) -> Result<()> {
        let expected = listing::expected_row_groups(self.config.page_size);
        self.driver
            .wait_for_condition(
                &listing::stabilized_expr(expected),
                PollMode::Mutation,
                self.config.wait_timeout,
            )
            .await
            .map_err(|e| Error::Navigation(format!("{e:#}")))
    }

    async fn has_next_control(&self) -> Result<bool> {
        let value = self.driver.evaluate(listing::NEXT_CONTROL_SCRIPT).await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    /// Read the pagination affordance, preferring dedicated current/total
    /// elements and falling back to the results-summary sentence.
    async fn read_indicator(&self) -> Result<(Option<u32>, Option<u32>)> {
        let value = self.driver.evaluate(listing::PAGE_INDICATOR_SCRIPT).await?;
        let indicator: PageIndicator = serde_json::from_value(value)
            .map_err(|e| Error::Driver(anyhow::anyhow!("unreadable page indicator: {e}")))?;

        if indicator.current.is_some() || indicator.total.is_some() {
            return Ok((indicator.current, indicator.total));
        }

        // Compatibility shim: older renderings only expose "page N of M"
        // inside the summary sentence.
        if let Some(caps) = self.summary_pattern.captures(&indicator.summary) {
            let current = caps[1].parse().ok();
            let total = caps[2].parse().ok();
            warn!(summary = %indicator.summary, "pagination read via summary text fallback");
            return Ok((current, total));
        }

        Ok((None, None))
    }

    async fn read_pagination(&self) -> Result<PaginationState> {
        let (current, total) = self.read_indicator().await?;
        Ok(PaginationState {
            current_page: current.unwrap_or(1),
            total_pages: total.unwrap_or(1),
            has_more: false,
        })
    }

    /// Click the next-page control and wait for the current-page indicator
    /// to change. Returns the page landed on.
    async fn advance(&self, from: u32) -> Result<u32> {
        self.driver.click(listing::NEXT_CONTROL).await?;

        for _ in 0..ADVANCE_CHECKS {
            let (current, _) = self.read_indicator().await?;
            match current {
                Some(page) if page != from => return Ok(page),
                Some(_) => tokio::time::sleep(ADVANCE_POLL).await,
                None => {
                    // No indicator at all: the advance cannot be confirmed,
                    // so trust the click and keep counting locally.
                    warn!(from, "no page indicator; assuming advance succeeded");
                    return Ok(from + 1);
                }
            }
        }

        Err(Error::StagnantPagination {
            page: from,
            attempts: ADVANCE_CHECKS,
        })
    }
}
