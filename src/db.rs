use crate::config::DbConfig;
use crate::model::{Book, BookChanges, NewBook};
use crate::store::BookStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const SYSTEM_MIGRATION: &str = include_str!("migrations/system/000_migrations_table.sql");

const MIGRATIONS: &[(&str, &str)] = &[("001_books.sql", include_str!("migrations/001_books.sql"))];

// "books" in ASCII
const MIGRATION_LOCK_ID: i64 = 0x626f6f6b73;

const BOOK_COLUMNS: &str = "id, author, title, publisher, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(cfg: &DbConfig) -> Result<Self> {
        tracing::info!(host = %cfg.host, port = cfg.port, database = %cfg.name, "[db] connecting");

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(cfg.connect_options())
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to {}:{}/{}: {e}", cfg.host, cfg.port, cfg.name))?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Database { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Brings the schema up to date. Already applied migrations are skipped,
    /// so this is safe to run on every start. Concurrent callers are
    /// serialized on a transaction-scoped advisory lock.
    pub async fn migrate(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_ID)
            .execute(&mut *tx)
            .await?;

        (&mut *tx)
            .execute(sqlx::raw_sql(SYSTEM_MIGRATION))
            .await
            .map_err(|e| anyhow::anyhow!("failed to create migrations table: {e}"))?;

        for (name, sql) in MIGRATIONS {
            Self::run_migration(&mut tx, name, sql).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn run_migration(tx: &mut Transaction<'_, Postgres>, name: &str, sql: &str) -> Result<()> {
        let applied: Option<i32> = sqlx::query_scalar("SELECT 1 FROM _migrations WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        if applied.is_some() {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        (&mut **tx)
            .execute(sqlx::raw_sql(sql))
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        sqlx::query("INSERT INTO _migrations (name) VALUES ($1)")
            .bind(name)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl BookStore for Database {
    async fn create_book(&self, input: NewBook) -> Result<Book> {
        let query = format!(
            "INSERT INTO books (author, title, publisher) VALUES ($1, $2, $3) RETURNING {BOOK_COLUMNS}"
        );

        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&input.author)
            .bind(&input.title)
            .bind(&input.publisher)
            .fetch_one(&self.pool)
            .await?;

        Ok(book)
    }

    async fn list_books(&self) -> Result<Vec<Book>> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id");
        let books = sqlx::query_as::<_, Book>(&query).fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = $1");
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Option<Book>> {
        if changes.is_empty() {
            return self.get_book(id).await;
        }

        let query = format!(
            r#"
            UPDATE books SET
                author = COALESCE($1, author),
                title = COALESCE($2, title),
                publisher = COALESCE($3, publisher),
                updated_at = now()
            WHERE id = $4
            RETURNING {BOOK_COLUMNS}
            "#
        );

        let book = sqlx::query_as::<_, Book>(&query)
            .bind(changes.author())
            .bind(changes.title())
            .bind(changes.publisher())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn delete_book(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
