//! Browser driver abstraction.
//!
//! Defines the [`BrowserDriver`] trait the traversal core runs against. The
//! production implementation drives Chromium via chromiumoxide; tests swap in
//! a scripted fake. The driver session is a single exclusively-owned resource
//! for the lifetime of a run — no two operations execute concurrently.

pub mod chromium;

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

/// How [`BrowserDriver::wait_for_condition`] polls the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Dense polling, approximating a DOM-mutation-driven wait.
    Mutation,
    /// Relaxed interval polling.
    Interval,
}

impl PollMode {
    fn interval(self) -> Duration {
        match self {
            Self::Mutation => Duration::from_millis(50),
            Self::Interval => Duration::from_millis(250),
        }
    }
}

/// A browser session capable of navigating, interacting with form controls,
/// and evaluating read-only queries against the rendered document.
///
/// Every method is a cooperative suspension point.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to a URL and wait for the load to settle.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Evaluate a read-only script in the page and return its JSON value.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Focus the element at `selector` and type `text` into it.
    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Press a key (e.g. `"Enter"`) with the element at `selector` focused.
    async fn press_key(&self, selector: &str, key: &str) -> Result<()>;

    /// Choose `value` in the `<select>` at `selector`.
    async fn select_option(&self, selector: &str, value: &str) -> Result<()>;

    /// Click the element at `selector`.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Wait until an element matching `selector` exists.
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait for an in-flight navigation to complete.
    async fn wait_for_navigation(&self) -> Result<()>;

    /// Poll `expr` until it evaluates truthy, bounded by `timeout`.
    ///
    /// A bounded poll loop rather than a blocking spin: each probe awaits the
    /// page and each gap awaits a timer.
    async fn wait_for_condition(
        &self,
        expr: &str,
        poll: PollMode,
        timeout: Duration,
    ) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.evaluate(expr).await?.as_bool().unwrap_or(false) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                bail!("condition not met within {timeout:?}: {expr}");
            }
            tokio::time::sleep(poll.interval()).await;
        }
    }

    /// Close the session and release the browser.
    async fn close(self: Box<Self>) -> Result<()>;
}
