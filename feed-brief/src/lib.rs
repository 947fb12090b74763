pub mod types;
pub mod config;
pub mod utils;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod article;
pub mod sources;
pub mod storage;
pub mod notifier;
pub mod differ;
pub mod initial_sync;
pub mod response_parser;
pub mod llm_adapter;
pub mod summarizer;
pub mod pipeline;

pub use types::*;
pub use config::{Cli, Settings};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use article::HttpArticleSource;
pub use sources::RssFeedSource;
pub use storage::SqliteArticleStore;
pub use notifier::WeComNotifier;
pub use response_parser::Brief;
pub use llm_adapter::{LlmAdapterRegistry, LlmProvider};
pub use summarizer::Summarizer;
pub use pipeline::{IngestionPipeline, RunReport};
pub use traits::{ArticleSource, ArticleStore, FeedSource, Notifier};
