use crate::fetcher::Fetcher;
use crate::traits::ArticleSource;
use crate::types::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Article pages fetched over HTTP and reduced to their paragraphs.
pub struct HttpArticleSource {
    fetcher: Fetcher,
}

impl HttpArticleSource {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        let html = match self.fetcher.fetch_article_html(url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to download article {}: {}", url, e);
                return Ok(None);
            }
        };

        let text = extract_main_text(&html);
        if text.is_empty() {
            warn!("No textual content extracted from {}", url);
            return Ok(None);
        }
        Ok(Some(text))
    }
}

fn selector(css: &str) -> Selector {
    // Only called with the literal selectors below.
    Selector::parse(css).expect("valid CSS selector")
}

/// Readable text of a blog page: paragraphs and list items of the first
/// `<article>` (else `<main>`, else the whole page), joined by blank lines.
/// Falls back to every `<p>` on the page when the container has none.
pub fn extract_main_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let blocks = selector("p, li");

    let container = ["article", "main"]
        .iter()
        .find_map(|tag| document.select(&selector(tag)).next())
        .unwrap_or_else(|| document.root_element());

    let mut paragraphs: Vec<String> = container
        .select(&blocks)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&selector("p"))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect();
    }

    paragraphs.join("\n\n")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect::<String>()
}
