use crate::traits::ArticleStore;
use crate::types::{ArticleRecord, BriefError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    link TEXT NOT NULL,
    published TEXT NOT NULL,
    category TEXT,
    summary TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// SQLite-backed article store. Every operation opens its own connection
/// and closes it before returning.
pub struct SqliteArticleStore {
    path: PathBuf,
}

impl SqliteArticleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .foreign_keys(true);

        Ok(SqliteConnection::connect_with(&options).await?)
    }

    pub async fn get_article(&self, id: &str) -> Result<Option<ArticleRecord>> {
        let mut conn = self.connect().await?;
        let row = sqlx::query(
            "SELECT id, title, link, published, category, summary FROM articles WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await?;
        conn.close().await?;

        match row {
            Some(row) => {
                let published: String = row.get("published");
                Ok(Some(ArticleRecord {
                    id: row.get("id"),
                    title: row.get("title"),
                    link: row.get("link"),
                    published: DateTime::parse_from_rfc3339(&published)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| {
                            BriefError::Parse(format!("bad published timestamp for {}: {}", id, e))
                        })?,
                    category: row.get("category"),
                    summary: row.get("summary"),
                }))
            }
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> Result<i64> {
        let mut conn = self.connect().await?;
        let row = sqlx::query("SELECT COUNT(*) AS count FROM articles")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok(row.get::<i64, _>("count"))
    }
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn initialize(&self) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        conn.close().await?;
        info!("Article store ready at {}", self.path.display());
        Ok(())
    }

    async fn known_ids(&self) -> Result<HashSet<String>> {
        let mut conn = self.connect().await?;
        let rows = sqlx::query("SELECT id FROM articles")
            .fetch_all(&mut conn)
            .await?;
        conn.close().await?;

        let ids: HashSet<String> = rows.into_iter().map(|r| r.get("id")).collect();
        debug!("Loaded {} known ids", ids.len());
        Ok(ids)
    }

    async fn save(&self, record: &ArticleRecord) -> Result<()> {
        let mut conn = self.connect().await?;
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, link, published, category, summary)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (id)
            DO UPDATE SET
                title = excluded.title,
                link = excluded.link,
                published = excluded.published,
                category = excluded.category,
                summary = excluded.summary
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.link)
        .bind(record.published.to_rfc3339())
        .bind(&record.category)
        .bind(&record.summary)
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        debug!("Saved article {}", record.id);
        Ok(())
    }
}
