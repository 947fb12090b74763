use crate::response_parser::Brief;
use crate::traits::Notifier;
use crate::types::{BriefError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub const WEBHOOK_TIMEOUT_SECONDS: u64 = 10;

/// Markdown body sent for one summarized entry.
pub fn format_message(title: &str, brief: &Brief, link: &str) -> String {
    format!("{}\n\n[阅读原文]({})", brief.format_plaintext(title), link)
}

/// WeCom group robot webhook.
pub struct WeComNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl WeComNotifier {
    pub fn new(webhook_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for WeComNotifier {
    async fn notify(&self, markdown: &str) -> Result<()> {
        let webhook_url = self
            .webhook_url
            .as_deref()
            .ok_or_else(|| BriefError::Notification("WeCom webhook URL is not configured".to_string()))?;

        let payload = json!({
            "msgtype": "markdown",
            "markdown": { "content": markdown },
        });

        let response = self.client.post(webhook_url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let errcode = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("errcode").and_then(Value::as_i64));

        if status != StatusCode::OK || errcode != Some(0) {
            return Err(BriefError::Notification(format!(
                "webhook answered {} {}",
                status.as_u16(),
                body
            )));
        }

        debug!("Notification delivered");
        Ok(())
    }
}
