use crate::types::{BriefError, FetchConfig, Result};
use crate::utils::url::extract_host;
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Download the feed document, retrying transport errors and non-2xx
    /// statuses with exponential backoff.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();
        debug!("Fetching feed: {}", url);

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.get(url, self.config.timeout_seconds).await {
                Ok(response) => {
                    let status = response.status();

                    if !status.is_success() {
                        last_error = Some(BriefError::General(format!(
                            "HTTP {}: {}",
                            status,
                            status.canonical_reason().unwrap_or("Unknown")
                        )));
                    } else if let Some(size_mb) = response
                        .content_length()
                        .map(|len| len as usize / (1024 * 1024))
                        .filter(|size_mb| *size_mb > self.config.max_feed_size_mb)
                    {
                        return Err(BriefError::General(format!("Feed too large: {}MB", size_mb)));
                    } else {
                        match response.text().await {
                            Ok(content) => {
                                info!(
                                    "Fetched feed {} ({} bytes in {}ms)",
                                    url,
                                    content.len(),
                                    start_time.elapsed().as_millis()
                                );
                                return Ok(content);
                            }
                            Err(e) => last_error = Some(BriefError::Http(e)),
                        }
                    }
                }
                Err(e) => last_error = Some(e),
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        error!("Failed to fetch feed after {} attempts: {}", self.config.max_retries + 1, url);
        Err(last_error.unwrap_or_else(|| BriefError::General("Unknown error".to_string())))
    }

    /// Download an article page once; no retries.
    pub async fn fetch_article_html(&self, url: &str) -> Result<String> {
        debug!(
            "Fetching article from {}",
            extract_host(url).unwrap_or_else(|| url.to_string())
        );

        let response = self.get(url, self.config.article_timeout_seconds).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BriefError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        Ok(response.text().await?)
    }

    async fn get(&self, url: &str, timeout_seconds: u64) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(timeout_seconds))
            .send()
            .await?;
        Ok(response)
    }
}
