//! Persistent application store implementation using PostgreSQL.

use crate::domain::application::{AppId, ApplicationRecord};
use crate::storage::{ApplicationStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::warn;

pub const CREATE_APPLICATIONS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS applications (
    id VARCHAR(4) PRIMARY KEY CHECK (id <> 'anon'),
    email VARCHAR(250) NOT NULL UNIQUE,
    name VARCHAR(250) NOT NULL,
    app_name VARCHAR(250) NOT NULL,
    public_wallet VARCHAR(56) UNIQUE
)";

/// An application store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresApplicationStore {
    pool: PgPool,
}

impl PostgresApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` connections.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `applications` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_APPLICATIONS_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn schema_exists(&self) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = 'applications'
            )",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}

fn record_from_row(row: &PgRow) -> Result<ApplicationRecord, sqlx::Error> {
    Ok(ApplicationRecord {
        id: AppId::from_stored(row.try_get("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        app_name: row.try_get("app_name")?,
        public_wallet: row.try_get("public_wallet")?,
    })
}

/// Maps unique/primary-key/check violations to [`StoreError::Conflict`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() || db_err.is_check_violation() {
            return StoreError::Conflict(db_err.message().to_string());
        }
    }
    StoreError::Backend(err)
}

/// Rolls back after a failed statement and returns the statement's error.
async fn abort(transaction: Transaction<'_, Postgres>, err: sqlx::Error) -> StoreError {
    // A failed rollback leaves the transaction to be discarded with its connection.
    if let Err(rollback_err) = transaction.rollback().await {
        warn!(error = %rollback_err, "rollback failed");
    }
    classify(err)
}

#[async_trait]
impl ApplicationStore for PostgresApplicationStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn contains(&self, id: &AppId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM applications WHERE id = $1)")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn find(&self, id: &AppId) -> Result<Option<ApplicationRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, name, app_name, public_wallet FROM applications WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(record_from_row).transpose()?)
    }

    async fn insert(&self, record: &ApplicationRecord) -> Result<(), StoreError> {
        let mut transaction = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO applications (id, email, name, app_name, public_wallet)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.id.as_str())
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.app_name)
        .bind(record.public_wallet.as_deref())
        .execute(&mut *transaction)
        .await;

        if let Err(e) = result {
            return Err(abort(transaction, e).await);
        }
        transaction.commit().await.map_err(classify)?;
        Ok(())
    }

    async fn update(&self, record: &ApplicationRecord) -> Result<bool, StoreError> {
        let mut transaction = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE applications
             SET email = $2, name = $3, app_name = $4, public_wallet = $5
             WHERE id = $1",
        )
        .bind(record.id.as_str())
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.app_name)
        .bind(record.public_wallet.as_deref())
        .execute(&mut *transaction)
        .await;

        let affected = match result {
            Ok(done) => done.rows_affected(),
            Err(e) => return Err(abort(transaction, e).await),
        };
        transaction.commit().await.map_err(classify)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &AppId) -> Result<bool, StoreError> {
        let mut transaction = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id.as_str())
            .execute(&mut *transaction)
            .await;

        let affected = match result {
            Ok(done) => done.rows_affected(),
            Err(e) => return Err(abort(transaction, e).await),
        };
        transaction.commit().await.map_err(classify)?;
        Ok(affected > 0)
    }
}
