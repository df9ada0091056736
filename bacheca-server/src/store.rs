use bacheca_core::Message;
use sqlx::any::AnyPoolOptions;
use sqlx::{AnyPool, Row};
use thiserror::Error;

use crate::config::PoolConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unsupported database url scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("database did not report the inserted id")]
    MissingInsertId,
    #[error("db error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn from_url(url: &str) -> Result<Self, StoreError> {
        let scheme = url.split(':').next().unwrap_or_default().to_ascii_lowercase();
        match scheme.as_str() {
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            _ => Err(StoreError::UnsupportedScheme(scheme)),
        }
    }

    pub(crate) fn create_messages_table(self) -> &'static str {
        match self {
            Dialect::MySql => {
                r#"
                CREATE TABLE IF NOT EXISTS messages (
                    id   BIGINT AUTO_INCREMENT PRIMARY KEY,
                    text TEXT NOT NULL
                )"#
            }
            // AUTOINCREMENT keeps deleted ids from being handed out again
            Dialect::Sqlite => {
                r#"
                CREATE TABLE IF NOT EXISTS messages (
                    id   INTEGER PRIMARY KEY AUTOINCREMENT,
                    text TEXT NOT NULL
                )"#
            }
        }
    }

    fn select_messages(self) -> &'static str {
        match self {
            // the Any driver surfaces MySQL TEXT columns as blobs
            Dialect::MySql => "SELECT id, CAST(text AS CHAR) AS text FROM messages ORDER BY id",
            Dialect::Sqlite => "SELECT id, text FROM messages ORDER BY id",
        }
    }
}

/// Handle condiviso verso il database. Il pool apre le connessioni solo
/// quando servono: la prima è quella del probe di avvio.
#[derive(Debug, Clone)]
pub struct Store {
    pool: AnyPool,
    dialect: Dialect,
}

impl Store {
    pub fn connect_lazy(url: &str, options: &PoolConfig) -> Result<Self, StoreError> {
        let dialect = Dialect::from_url(url)?;
        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_lazy(url)?;
        Ok(Self { pool, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Trivial read-only statement used to check liveness.
    pub async fn probe(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(self.dialect.select_messages())
            .fetch_all(&self.pool)
            .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in rows {
            messages.push(Message {
                id: row.try_get("id")?,
                text: row.try_get("text")?,
            });
        }
        Ok(messages)
    }

    /// Inserts a message and returns the id assigned by the database.
    pub async fn insert_message(&self, text: &str) -> Result<i64, StoreError> {
        match self.dialect {
            // the Any driver only reports last_insert_id for MySQL
            Dialect::MySql => {
                let result = sqlx::query("INSERT INTO messages (text) VALUES (?)")
                    .bind(text)
                    .execute(&self.pool)
                    .await?;
                result.last_insert_id().ok_or(StoreError::MissingInsertId)
            }
            Dialect::Sqlite => {
                let row = sqlx::query("INSERT INTO messages (text) VALUES (?) RETURNING id")
                    .bind(text)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(row.try_get("id")?)
            }
        }
    }

    pub async fn update_message(&self, id: i64, text: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE messages SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_message(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
