// Copyright 2026 Marketgrab Contributors
// SPDX-License-Identifier: Apache-2.0

//! Top-level run coordination: open the listing, traverse it, finalize the
//! artifact, close the browser.

use crate::artifact::ArtifactWriter;
use crate::config::ExtractionConfig;
use crate::driver::chromium::ChromiumDriver;
use crate::driver::BrowserDriver;
use crate::error::{Error, Result};
use crate::traverse::TraversalEngine;
use std::path::PathBuf;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Owns one run end to end. The result set grows monotonically during the
/// traversal and is finalized exactly once.
pub struct SessionOrchestrator {
    config: ExtractionConfig,
}

impl SessionOrchestrator {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Launch a browser, harvest every page, and write the artifact.
    /// Returns the written artifact location.
    pub async fn run(&self) -> Result<PathBuf> {
        let driver = ChromiumDriver::launch(&self.config)
            .await
            .map_err(Error::Driver)?;
        let driver: Box<dyn BrowserDriver> = Box::new(driver);

        let outcome = self.run_with_driver(driver.as_ref()).await;

        // Close regardless of the run outcome; a close failure never masks
        // the traversal result.
        if let Err(e) = driver.close().await {
            warn!("failed to close browser session: {e:#}");
        }
        outcome
    }

    /// Run against an already-open driver session. The session is borrowed
    /// exclusively for the whole run; the caller closes it.
    pub async fn run_with_driver(&self, driver: &dyn BrowserDriver) -> Result<PathBuf> {
        let run_id = Uuid::new_v4();
        let span = info_span!("harvest", run_id = %run_id);

        async {
            driver
                .goto(self.config.url.as_str())
                .await
                .map_err(|e| Error::Navigation(format!("{e:#}")))?;

            let engine = TraversalEngine::new(driver, &self.config);
            let records = engine.run().await?;

            let writer = ArtifactWriter::new(&self.config.output_dir, self.config.compress);
            let path = writer.write(&records)?;
            info!(records = records.len(), path = %path.display(), "run complete");
            Ok(path)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DelayPolicy, PageSize, SortField};
    use crate::testkit::FakeListing;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;
    use std::time::Duration;

    fn page(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config(output_dir: std::path::PathBuf, compress: bool) -> ExtractionConfig {
        ExtractionConfig {
            url: "https://example.com/marketplace.htm".parse().unwrap(),
            search_keywords: "garden".into(),
            page_size: PageSize::Fifty,
            sort_field: SortField::Gravity,
            delay: DelayPolicy::Fixed(0),
            headless: true,
            compress,
            output_dir,
            wait_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_page_run_writes_the_expected_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeListing::new(vec![
            page(&["r1", "s1", "i1", "r2", "s2", "i2"]),
            page(&["r3", "s3", "i3"]),
        ]);
        let orchestrator = SessionOrchestrator::new(config(dir.path().to_path_buf(), false));

        let path = orchestrator.run_with_driver(&fake).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_json_eq!(
            parsed,
            json!([
                {"result": "r1", "marketplaceStats": "s1", "icons": "i1"},
                {"result": "r2", "marketplaceStats": "s2", "icons": "i2"},
                {"result": "r3", "marketplaceStats": "s3", "icons": "i3"},
            ])
        );

        // The listing was opened before anything was typed into it.
        let calls = fake.calls();
        assert!(calls[0].starts_with("goto:https://example.com/"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_surfaces_malformed_listing() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeListing::new(vec![page(&["r1", "s1"])]);
        let orchestrator = SessionOrchestrator::new(config(dir.path().to_path_buf(), false));

        let err = orchestrator.run_with_driver(&fake).await.unwrap_err();
        assert!(matches!(err, Error::MalformedPage { count: 2 }));
        // No partial artifact.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compressed_run_names_the_artifact_gz() {
        let dir = tempfile::tempdir().unwrap();
        let fake = FakeListing::new(vec![page(&["r1", "s1", "i1"])]);
        let orchestrator = SessionOrchestrator::new(config(dir.path().to_path_buf(), true));

        let path = orchestrator.run_with_driver(&fake).await.unwrap();
        assert!(path.extension().is_some_and(|e| e == "gz"));
        assert!(path.exists());
    }
}
