//! Durable snippet storage over SQLite.
//!
//! The store is an explicitly constructed handle with an explicit lifecycle:
//! opened at process start, passed by reference into pipeline functions, and
//! closed at shutdown. From this system's perspective it is append-only.
//! There is no update or delete path, and re-indexing the same repository
//! appends new rows.
//!
//! `tags` and `embedding` are persisted as JSON-encoded TEXT columns. The
//! read path normalizes whatever shape the decoder hands back (an array or
//! a raw JSON string) into the same in-memory types.

use anyhow::{anyhow, bail, Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;

use crate::config::Config;
use crate::models::{Snippet, SnippetKind, StoredSnippet};

pub struct SnippetStore {
    pool: SqlitePool,
}

impl SnippetStore {
    /// Open the SQLite database configured in `[db]`, creating it (and its
    /// parent directory) if missing.
    pub async fn open(config: &Config) -> Result<Self> {
        let db_path = &config.db.path;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema. Idempotent.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS code_snippets (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                file_path     TEXT NOT NULL,
                function_name TEXT,
                code          TEXT NOT NULL,
                type          TEXT NOT NULL,
                tags          TEXT NOT NULL DEFAULT '[]',
                embedding     TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_code_snippets_file ON code_snippets(file_path)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Persist a batch of embedded snippets.
    ///
    /// No-op on empty input. Otherwise all rows go into one multi-row
    /// `INSERT` inside a transaction, so a failure partway through never
    /// leaves a partial batch behind. Every snippet must already carry its
    /// embedding.
    pub async fn bulk_write(&self, snippets: &[Snippet]) -> Result<u64> {
        if snippets.is_empty() {
            return Ok(0);
        }

        let mut rows = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            let embedding = snippet
                .embedding
                .as_ref()
                .ok_or_else(|| anyhow!("snippet from {} has no embedding", snippet.file))?;
            rows.push((
                snippet.file.clone(),
                snippet.name.clone(),
                snippet.code.clone(),
                snippet.kind.as_str(),
                serde_json::to_string(&snippet.tags)?,
                serde_json::to_string(embedding)?,
            ));
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO code_snippets (file_path, function_name, code, type, tags, embedding) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.0)
                .push_bind(row.1)
                .push_bind(row.2)
                .push_bind(row.3)
                .push_bind(row.4)
                .push_bind(row.5);
        });

        let mut tx = self.pool.begin().await?;
        let result = builder.build().execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    /// Read back every snippet whose embedding is present, with `tags` and
    /// `embedding` decoded into their in-memory shapes.
    pub async fn scan_embedded(&self) -> Result<Vec<StoredSnippet>> {
        let rows = sqlx::query(
            "SELECT id, file_path, function_name, code, type, tags, embedding \
             FROM code_snippets WHERE embedding IS NOT NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut snippets = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.get("id");
            let kind_text: String = row.get("type");
            let kind = SnippetKind::parse(&kind_text)
                .ok_or_else(|| anyhow!("unknown snippet type in store: {kind_text}"))?;

            let tags_raw: String = row.get("tags");
            let embedding_raw: String = row.get("embedding");

            snippets.push(StoredSnippet {
                id,
                file: row.get("file_path"),
                name: row.get("function_name"),
                kind,
                code: row.get("code"),
                tags: decode_string_array(&tags_raw)
                    .with_context(|| format!("invalid tags payload for snippet {id}"))?,
                embedding: decode_float_array(&embedding_raw)
                    .with_context(|| format!("invalid embedding payload for snippet {id}"))?,
            });
        }

        Ok(snippets)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Decode a JSON float array, tolerating a decoder that hands back either
/// the array itself or the array re-wrapped as a JSON string.
pub fn decode_float_array(raw: &str) -> Result<Vec<f32>> {
    json_floats(&serde_json::from_str(raw)?)
}

fn json_floats(value: &serde_json::Value) -> Result<Vec<f32>> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| anyhow!("non-numeric embedding element: {v}"))
            })
            .collect(),
        serde_json::Value::String(inner) => json_floats(&serde_json::from_str(inner)?),
        other => bail!("unexpected embedding payload: {other}"),
    }
}

/// Decode a JSON string array with the same double-encoding tolerance as
/// [`decode_float_array`].
pub fn decode_string_array(raw: &str) -> Result<Vec<String>> {
    json_strings(&serde_json::from_str(raw)?)
}

fn json_strings(value: &serde_json::Value) -> Result<Vec<String>> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| anyhow!("non-string tag element: {v}"))
            })
            .collect(),
        serde_json::Value::String(inner) => json_strings(&serde_json::from_str(inner)?),
        other => bail!("unexpected tags payload: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_floats_from_array() {
        assert_eq!(decode_float_array("[0.1, 0.2]").unwrap(), vec![0.1f32, 0.2]);
    }

    #[test]
    fn decode_floats_from_double_encoded_string() {
        assert_eq!(
            decode_float_array("\"[0.1, 0.2]\"").unwrap(),
            vec![0.1f32, 0.2]
        );
    }

    #[test]
    fn decode_floats_rejects_garbage() {
        assert!(decode_float_array("{\"a\": 1}").is_err());
        assert!(decode_float_array("[\"x\"]").is_err());
    }

    #[test]
    fn decode_strings_keeps_duplicates_and_empties() {
        assert_eq!(
            decode_string_array(r#"["api", "GET", "", "api"]"#).unwrap(),
            vec!["api", "GET", "", "api"]
        );
    }

    #[test]
    fn decode_strings_from_double_encoded_string() {
        assert_eq!(
            decode_string_array(r#""[\"api\"]""#).unwrap(),
            vec!["api"]
        );
    }
}
