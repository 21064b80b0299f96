//! Web page loader: render, then extract visible text

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use thirtyfour::prelude::*;

use crate::config::LoaderConfig;
use crate::error::{Error, Result};
use crate::types::{Document, SourceMetadata};

/// Trait for turning a URL into final page HTML
///
/// The default backend drives headless Chrome through a WebDriver
/// endpoint, so client-side script has run before the DOM is read. The
/// static backend is a plain GET for environments without a browser.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Fetch and render the page, returning its HTML
    async fn render(&self, url: &str) -> Result<String>;

    /// Renderer name for logging
    fn name(&self) -> &str;
}

/// Headless Chrome renderer via a WebDriver endpoint
pub struct WebDriverRenderer {
    webdriver_url: String,
}

impl WebDriverRenderer {
    /// Create a renderer pointing at a chromedriver endpoint
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
        }
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        url::Url::parse(url).map_err(|e| Error::InvalidRequest(format!("invalid URL '{}': {}", url, e)))?;

        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()
            .map_err(|e| Error::Render(format!("capability setup failed: {}", e)))?;

        let driver = WebDriver::new(&self.webdriver_url, caps)
            .await
            .map_err(|e| Error::Render(format!("webdriver session failed: {}", e)))?;

        let result = async {
            driver
                .goto(url)
                .await
                .map_err(|e| Error::Fetch(format!("navigation to {} failed: {}", url, e)))?;
            driver
                .source()
                .await
                .map_err(|e| Error::Render(format!("reading page source failed: {}", e)))
        }
        .await;

        // Always tear the session down, even on failure.
        if let Err(e) = driver.quit().await {
            tracing::warn!("webdriver session cleanup failed: {}", e);
        }

        result
    }

    fn name(&self) -> &str {
        "webdriver"
    }
}

/// Plain-GET renderer; no script execution
pub struct StaticRenderer {
    http: reqwest::Client,
}

impl StaticRenderer {
    /// Create a static renderer
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageRenderer for StaticRenderer {
    async fn render(&self, url: &str) -> Result<String> {
        url::Url::parse(url).map_err(|e| Error::InvalidRequest(format!("invalid URL '{}': {}", url, e)))?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::Fetch(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("reading body of {} failed: {}", url, e)))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Loader producing one document per web page
pub struct WebLoader {
    renderer: Box<dyn PageRenderer>,
}

impl WebLoader {
    /// Create a loader over the given renderer
    pub fn new(renderer: Box<dyn PageRenderer>) -> Self {
        Self { renderer }
    }

    /// Fetch, render, and extract the page's visible text
    pub async fn load(&self, url: &str) -> Result<Vec<Document>> {
        tracing::info!(url, renderer = self.renderer.name(), "loading web page");

        let html = self.renderer.render(url).await?;
        let (text, title) = extract_page_text(&html);

        if text.is_empty() {
            return Err(Error::Render(format!("{} rendered to an empty page", url)));
        }

        let metadata = SourceMetadata::web(url, title);
        Ok(vec![Document::new(text, metadata)])
    }
}

/// Extract visible text and the page title from HTML
///
/// Walks the DOM skipping script/style/noscript subtrees, then collapses
/// runs of whitespace.
pub fn extract_page_text(html: &str) -> (String, Option<String>) {
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").expect("static selector");
    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let mut raw = String::new();
    collect_visible_text(document.root_element(), &mut raw);

    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (text, title)
}

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "head", "template"];

fn collect_visible_text(node: scraper::ElementRef<'_>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            scraper::Node::Element(el) => {
                if SKIPPED_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(element) = scraper::ElementRef::wrap(child) {
                    collect_visible_text(element, out);
                }
            }
            scraper::Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;

    const PAGE: &str = r#"
        <html>
          <head>
            <title>Example Domain</title>
            <style>body { color: red; }</style>
          </head>
          <body>
            <script>console.log("hidden");</script>
            <h1>Example Domain</h1>
            <p>This domain is for use in   documents.</p>
            <noscript>Please enable JavaScript.</noscript>
          </body>
        </html>
    "#;

    #[test]
    fn extracts_visible_text_only() {
        let (text, title) = extract_page_text(PAGE);

        assert!(text.contains("This domain is for use in documents."));
        assert!(!text.contains("console.log"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("enable JavaScript"));
        assert_eq!(title.as_deref(), Some("Example Domain"));
    }

    #[test]
    fn whitespace_is_collapsed() {
        let (text, _) = extract_page_text(PAGE);
        assert!(!text.contains("  "));
    }

    struct FixedRenderer(&'static str);

    #[async_trait]
    impl PageRenderer for FixedRenderer {
        async fn render(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn loader_produces_one_document_with_url_source_id() {
        let loader = WebLoader::new(Box::new(FixedRenderer(PAGE)));
        let docs = loader.load("https://example.com/").await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].metadata.source_type, SourceType::Web);
        assert_eq!(docs[0].metadata.source_id, "https://example.com/");
        assert_eq!(docs[0].metadata.title.as_deref(), Some("Example Domain"));
    }

    #[tokio::test]
    async fn empty_page_is_a_render_error() {
        let loader = WebLoader::new(Box::new(FixedRenderer("<html><body></body></html>")));
        let err = loader.load("https://example.com/").await.unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}
