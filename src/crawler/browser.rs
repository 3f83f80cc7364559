//! Headless-browser link extraction (feature `browser`)
//!
//! Each call launches its own Chromium session, renders the embed URL,
//! reads anchors from every reachable frame plus any Google redirect
//! targets hidden in the markup, and closes the browser before returning,
//! whatever the outcome.

use crate::config::RenderConfig;
use crate::crawler::extractor::{extract_redirect_targets, LinkExtractor};
use crate::crawler::parser::dedup_preserve_order;
use crate::RenderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;

/// Collects raw hrefs from the top document and every same-origin frame
const FRAME_ANCHORS_JS: &str = r#"
(() => {
  const hrefs = [];
  const collect = (doc) => {
    doc.querySelectorAll('a[href]').forEach((a) => hrefs.push(a.getAttribute('href')));
  };
  collect(document);
  for (const frame of document.querySelectorAll('iframe, frame')) {
    try {
      if (frame.contentDocument) collect(frame.contentDocument);
    } catch (e) {}
  }
  return hrefs;
})()
"#;

/// Renders presentations in headless Chromium
pub struct BrowserExtractor {
    timeout: Duration,
    settle: Duration,
}

impl BrowserExtractor {
    /// Returns an extractor if a browser executable can be located
    pub fn detect(config: &RenderConfig) -> Result<Self, RenderError> {
        BrowserConfig::builder()
            .build()
            .map_err(RenderError::Unavailable)?;

        Ok(Self {
            timeout: Duration::from_secs(config.timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
        })
    }

    async fn render(&self, browser: &Browser, url: &str) -> Result<Vec<String>, RenderError> {
        let failed = |e: &dyn std::fmt::Display| RenderError::Failed {
            url: url.to_string(),
            message: e.to_string(),
        };

        let page = browser.new_page(url).await.map_err(|e| failed(&e))?;
        page.wait_for_navigation().await.map_err(|e| failed(&e))?;
        tokio::time::sleep(self.settle).await;

        let mut links: Vec<String> = page
            .evaluate(FRAME_ANCHORS_JS)
            .await
            .map_err(|e| failed(&e))?
            .into_value()
            .map_err(|e| failed(&e))?;

        let html = page.content().await.map_err(|e| failed(&e))?;
        links.extend(extract_redirect_targets(&html));

        Ok(dedup_preserve_order(links))
    }
}

#[async_trait]
impl LinkExtractor for BrowserExtractor {
    fn name(&self) -> &'static str {
        "browser"
    }

    async fn extract_links(&self, url: &str) -> Result<Vec<String>, RenderError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(RenderError::Unavailable)?;
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Rendering {}", url);
        let outcome = tokio::time::timeout(self.timeout, self.render(&browser, url)).await;

        if let Err(e) = browser.close().await {
            tracing::warn!("Failed to close browser after {}: {}", url, e);
        }
        let _ = browser.wait().await;
        handler_task.abort();

        match outcome {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}
