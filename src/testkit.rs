//! Scripted fake listing for driving the traversal core in tests.
//!
//! Plays the role of a rendered marketplace: a fixed sequence of pages, a
//! next-page control that exists while more pages remain, and a page
//! indicator that can be switched to summary-text-only mode or wedged to
//! simulate a page that refuses to advance.

use crate::driver::BrowserDriver;
use crate::listing;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeListing {
    pages: Vec<Vec<String>>,
    current: Mutex<usize>, // 0-based
    stuck: bool,
    summary_only: bool,
    calls: Mutex<Vec<String>>,
    served: Mutex<Vec<u32>>,
}

impl FakeListing {
    /// A listing with the given fragment sequence per page.
    pub fn new(pages: Vec<Vec<String>>) -> Self {
        assert!(!pages.is_empty(), "a listing renders at least one page");
        Self {
            pages,
            current: Mutex::new(0),
            stuck: false,
            summary_only: false,
            calls: Mutex::new(Vec::new()),
            served: Mutex::new(Vec::new()),
        }
    }

    /// Clicking "next" no longer changes the page indicator.
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Hide the dedicated current/total elements; pagination is only
    /// readable from the results-summary sentence.
    pub fn summary_only(mut self) -> Self {
        self.summary_only = true;
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every driver call made, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times the rows query ran.
    pub fn rows_evaluations(&self) -> usize {
        self.served.lock().unwrap().len()
    }

    /// 1-based page numbers in the order their rows were read.
    pub fn pages_served(&self) -> Vec<u32> {
        self.served.lock().unwrap().clone()
    }

    /// How many times the next-page control was clicked.
    pub fn next_clicks(&self) -> usize {
        let prefix = format!("click:{}", listing::NEXT_CONTROL);
        self.calls.lock().unwrap().iter().filter(|c| **c == prefix).count()
    }
}

#[async_trait]
impl BrowserDriver for FakeListing {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto:{url}"));
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let current = *self.current.lock().unwrap();
        if script == listing::ROWS_SCRIPT {
            self.served.lock().unwrap().push(current as u32 + 1);
            return Ok(json!(self.pages[current]));
        }
        if script == listing::NEXT_CONTROL_SCRIPT {
            return Ok(json!(current + 1 < self.pages.len()));
        }
        if script == listing::PAGE_INDICATOR_SCRIPT {
            return Ok(if self.summary_only {
                json!({
                    "current": null,
                    "total": null,
                    "summary": format!(
                        "Displaying results (page {} of {})",
                        current + 1,
                        self.pages.len()
                    ),
                })
            } else {
                json!({
                    "current": current + 1,
                    "total": self.pages.len(),
                    "summary": "",
                })
            });
        }
        if script.starts_with(listing::ROW_GROUP_COUNT_EXPR) {
            // The fake page is always settled.
            return Ok(json!(true));
        }
        panic!("unexpected script evaluated against fake listing: {script}");
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.record(format!("type:{selector}={text}"));
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<()> {
        self.record(format!("press:{selector}:{key}"));
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        self.record(format!("select:{selector}={value}"));
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click:{selector}"));
        if selector == listing::NEXT_CONTROL && !self.stuck {
            let mut current = self.current.lock().unwrap();
            if *current + 1 < self.pages.len() {
                *current += 1;
            }
        }
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("wait_selector:{selector}"));
        Ok(())
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        self.record("wait_navigation".to_string());
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
