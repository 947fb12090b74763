use crate::types::{BriefError, Result};
use crate::utils::url::is_valid_http_url;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_FEED_URL: &str = "https://blog.cloudflare.com/rss/";
pub const DEFAULT_DATABASE_PATH: &str = "cloudflare_blog.db";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MESSAGE_KEY: &str = "messages";
pub const DEFAULT_INITIAL_SUMMARY_LIMIT: usize = 5;

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub feed_url: String,
    pub database_path: PathBuf,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub custom_api_url: Option<String>,
    pub custom_api_key: Option<String>,
    pub custom_model: Option<String>,
    pub custom_message_key: String,
    pub wecom_webhook: Option<String>,
    pub initial_summary_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            custom_api_url: None,
            custom_api_key: None,
            custom_model: None,
            custom_message_key: DEFAULT_MESSAGE_KEY.to_string(),
            wecom_webhook: None,
            initial_summary_limit: DEFAULT_INITIAL_SUMMARY_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            feed_url: get("CF_BLOG_FEED").unwrap_or(defaults.feed_url),
            database_path: get("CF_BLOG_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            custom_api_url: get("LLM_API_URL"),
            custom_api_key: get("LLM_API_KEY"),
            custom_model: get("LLM_MODEL"),
            custom_message_key: get("LLM_MESSAGE_KEY").unwrap_or(defaults.custom_message_key),
            wecom_webhook: get("WECOM_WEBHOOK"),
            initial_summary_limit: parse_initial_summary_limit(
                get("INITIAL_SUMMARY_LIMIT").as_deref(),
            ),
        }
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(feed_url) = &cli.feed_url {
            self.feed_url = feed_url.clone();
        }
        if let Some(database) = &cli.database {
            self.database_path = database.clone();
        }
        if let Some(limit) = &cli.initial_summary_limit {
            self.initial_summary_limit = parse_initial_summary_limit(Some(limit));
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_http_url(&self.feed_url) {
            return Err(BriefError::Config(format!("invalid feed URL: {}", self.feed_url)));
        }
        for (name, value) in [
            ("WECOM_WEBHOOK", &self.wecom_webhook),
            ("LLM_API_URL", &self.custom_api_url),
        ] {
            if let Some(url) = value {
                if !is_valid_http_url(url) {
                    return Err(BriefError::Config(format!("invalid {}: {}", name, url)));
                }
            }
        }
        Ok(())
    }

    /// Model sent to the custom endpoint; defaults to the default provider's model.
    pub fn custom_model_name(&self) -> &str {
        self.custom_model.as_deref().unwrap_or(&self.openai_model)
    }
}

/// Invalid or absent input falls back to the default; negatives clamp to 0.
pub fn parse_initial_summary_limit(raw: Option<&str>) -> usize {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(value)) if value < 0 => 0,
        Some(Ok(value)) => usize::try_from(value).unwrap_or(usize::MAX),
        _ => DEFAULT_INITIAL_SUMMARY_LIMIT,
    }
}

#[derive(Debug, Parser)]
#[command(name = "feed-brief", about = "Summarize new blog posts and forward them to a webhook")]
pub struct Cli {
    /// Feed URL (overrides CF_BLOG_FEED)
    #[arg(long)]
    pub feed_url: Option<String>,

    /// SQLite database path (overrides CF_BLOG_DB)
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Entries summarized on the first run (overrides INITIAL_SUMMARY_LIMIT)
    #[arg(long, allow_hyphen_values = true)]
    pub initial_summary_limit: Option<String>,
}
