//! Page extraction: read the current page's row fragments through the
//! browser driver and hand them to the assembler.

use crate::assemble::{assemble, Record};
use crate::driver::BrowserDriver;
use crate::error::{Error, Result};
use crate::listing;
use tracing::debug;

/// Extracts records from whatever page the driver currently shows.
pub struct PageExtractor<'a> {
    driver: &'a dyn BrowserDriver,
}

impl<'a> PageExtractor<'a> {
    pub fn new(driver: &'a dyn BrowserDriver) -> Self {
        Self { driver }
    }

    /// Collect every row fragment in document order and group them into
    /// records. Surfaces [`Error::MalformedPage`] on a fragment count that is
    /// not a multiple of three.
    pub async fn extract_current_page(&self) -> Result<Vec<Record>> {
        let value = self.driver.evaluate(listing::ROWS_SCRIPT).await?;
        let fragments: Vec<String> = serde_json::from_value(value)
            .map_err(|e| Error::Driver(anyhow::anyhow!("rows query returned non-strings: {e}")))?;
        debug!(fragments = fragments.len(), "collected row fragments");
        assemble(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::FakeListing;

    fn page(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_extracts_current_page_in_document_order() {
        let fake = FakeListing::new(vec![page(&["r1", "s1", "i1", "r2", "s2", "i2"])]);
        let records = PageExtractor::new(&fake).extract_current_page().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].result, "r1");
        assert_eq!(records[1].icons, "i2");
    }

    #[tokio::test]
    async fn test_surfaces_malformed_page() {
        let fake = FakeListing::new(vec![page(&["r1", "s1", "i1", "r2"])]);
        let err = PageExtractor::new(&fake).extract_current_page().await.unwrap_err();
        assert!(matches!(err, Error::MalformedPage { count: 4 }));
    }

    #[tokio::test]
    async fn test_empty_page_yields_no_records() {
        let fake = FakeListing::new(vec![Vec::new()]);
        let records = PageExtractor::new(&fake).extract_current_page().await.unwrap();
        assert!(records.is_empty());
    }
}
