//! Chromium-backed browser driver using chromiumoxide.

use super::BrowserDriver;
use crate::config::ExtractionConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Window size the listing is rendered at. The marketplace reflows below
/// this width and the row-group structure changes with it.
const WINDOW_SIZE: (u32, u32) = (1460, 1070);

/// Desktop Chrome user agent presented to the remote service.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. MARKETGRAB_CHROMIUM_PATH env
    if let Ok(p) = std::env::var("MARKETGRAB_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. ~/.marketgrab/chromium/
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".marketgrab/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".marketgrab/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".marketgrab/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".marketgrab/chromium/chrome-linux64/chrome"),
                home.join(".marketgrab/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    // 3. System PATH
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A single Chromium session driving the listing.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    nav_timeout: Duration,
}

impl ChromiumDriver {
    /// Launch Chromium and open one page, per the run configuration.
    pub async fn launch(config: &ExtractionConfig) -> Result<Self> {
        let chrome_path = find_chromium()
            .context("Chromium not found. Set MARKETGRAB_CHROMIUM_PATH or install Chrome.")?;

        let (width, height) = WINDOW_SIZE;
        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--user-agent={USER_AGENT}"));
        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("failed to launch Chromium")?;

        // Spawn the handler task
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create page")?;

        debug!(headless = config.headless, "Chromium session ready");

        Ok(Self {
            browser,
            page,
            nav_timeout: config.wait_timeout,
        })
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        let result = tokio::time::timeout(self.nav_timeout, self.page.goto(url)).await;
        match result {
            Ok(Ok(_response)) => {
                let _ = self.page.wait_for_navigation().await;
                Ok(())
            }
            Ok(Err(e)) => bail!("navigation to {url} failed: {e}"),
            Err(_) => bail!("navigation to {url} timed out after {:?}", self.nav_timeout),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("page evaluation failed")?;
        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert evaluation result: {e:?}"))
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("element not found: {selector}"))?;
        element.click().await?.type_str(text).await?;
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("element not found: {selector}"))?;
        element.press_key(key).await?;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> Result<()> {
        // chromiumoxide has no select helper; set the value and fire the
        // change event the listing's own handlers listen for.
        let script = format!(
            "(() => {{ const el = document.querySelector('{selector}'); \
             if (!el) return false; el.value = '{value}'; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true; }})()"
        );
        let applied = self.evaluate(&script).await?.as_bool().unwrap_or(false);
        if !applied {
            bail!("select not found: {selector}");
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("element not found: {selector}"))?;
        element.click().await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                bail!("selector did not appear within {timeout:?}: {selector}");
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    async fn wait_for_navigation(&self) -> Result<()> {
        tokio::time::timeout(self.nav_timeout, self.page.wait_for_navigation())
            .await
            .map_err(|_| anyhow::anyhow!("navigation timed out after {:?}", self.nav_timeout))?
            .context("navigation failed")?;
        Ok(())
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        let _ = self.page.close().await;
        self.browser.close().await.context("failed to close browser")?;
        Ok(())
    }
}
