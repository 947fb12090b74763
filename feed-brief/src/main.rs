use anyhow::Context;
use clap::Parser;
use feed_brief::types::FetchConfig;
use feed_brief::{
    Cli, Fetcher, HttpArticleSource, IngestionPipeline, RssFeedSource, Settings,
    SqliteArticleStore, Summarizer, WeComNotifier,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::from_env().with_cli(&cli);
    settings.validate()?;

    info!("Starting feed brief run for {}", settings.feed_url);
    if settings.wecom_webhook.is_none() {
        info!("WECOM_WEBHOOK is not set, notifications will fail and be logged");
    }

    let store = SqliteArticleStore::new(settings.database_path.clone());
    info!("Using database: {}", store.path().display());

    let fetch_config = FetchConfig::default();
    let feed = RssFeedSource::new(settings.feed_url.clone(), Fetcher::new(fetch_config.clone())?);
    let articles = HttpArticleSource::new(Fetcher::new(fetch_config)?);
    let notifier = WeComNotifier::new(settings.wecom_webhook.clone())?;
    let summarizer = Summarizer::from_settings(&settings)?;

    let pipeline = IngestionPipeline::new(
        Box::new(feed),
        Box::new(articles),
        Box::new(store),
        Box::new(notifier),
        summarizer,
        settings.initial_summary_limit,
    );

    let report = pipeline
        .run()
        .await
        .with_context(|| format!("run against {} failed", settings.feed_url))?;

    info!(
        "Done: {} new, {} summarized, {} archived, {} notified",
        report.unseen, report.summarized, report.archived, report.notified
    );
    Ok(())
}
