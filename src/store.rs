use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::transaction::{NewTransaction, Transaction};

const CREATE_TRANSACTIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL CHECK(length(description) <= 50),
        amount DECIMAL(10, 2) NOT NULL,
        transaction_date TEXT NOT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored amount {0:?} is not a decimal")]
    CorruptAmount(String),
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists an already validated transaction and returns it with its id.
    async fn insert(&self, transaction: &NewTransaction) -> Result<Transaction, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Transaction>, StoreError>;
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    description: String,
    amount: String,
    transaction_date: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let mut amount = Decimal::from_str(&row.amount)
            .map_err(|_| StoreError::CorruptAmount(row.amount.clone()))?;
        amount.rescale(2);

        Ok(Transaction {
            id: row.id,
            description: row.description,
            amount,
            transaction_date: row.transaction_date,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    pool: SqlitePool,
}

impl SqliteTransactionStore {
    /// Opens (creating if needed) the database at `url` and makes sure the
    /// `transactions` table exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        // Every connection to `:memory:` is its own database.
        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
        };

        let store = Self {
            pool: pool_options.connect_with(options).await?,
        };
        store.migrate().await?;
        info!(target: "store", "transaction store ready at {url}");

        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TRANSACTIONS_TABLE)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    async fn insert(&self, transaction: &NewTransaction) -> Result<Transaction, StoreError> {
        let id = sqlx::query(
            "INSERT INTO transactions (description, amount, transaction_date) VALUES (?, ?, ?)",
        )
        .bind(&transaction.description)
        .bind(transaction.amount.to_string())
        .bind(&transaction.transaction_date)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Transaction::from_new(id, transaction.clone()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Transaction>, StoreError> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, description, CAST(amount AS TEXT) AS amount, transaction_date \
             FROM transactions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Transaction::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::MAX_AMOUNT;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn creates_transactions_table() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;

        let name: (String,) = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='transactions'",
        )
        .fetch_one(store.pool())
        .await?;

        assert_eq!(name.0, "transactions");
        Ok(())
    }

    #[tokio::test]
    async fn migrate_is_repeatable() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;
        store.migrate().await?;
        store.migrate().await?;
        Ok(())
    }

    #[tokio::test]
    async fn inserts_and_reads_back() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let url = format!("sqlite://{}", dir.path().join("test.db").display());
        let store = SqliteTransactionStore::connect(&url).await?;

        let stored = store
            .insert(&NewTransaction::new("Test", dec!(12.34), "2020-01-01"))
            .await?;
        assert!(stored.id > 0);

        let fetched = store.get_by_id(stored.id).await?;
        assert_eq!(fetched, Some(stored));
        Ok(())
    }

    #[tokio::test]
    async fn whole_amount_reads_back_with_cents() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;

        let stored = store
            .insert(&NewTransaction::new("Coffee", dec!(1.00), "2020-01-01"))
            .await?;
        let fetched = store.get_by_id(stored.id).await?.unwrap();

        assert_eq!(fetched.amount.to_string(), "1.00");
        Ok(())
    }

    #[tokio::test]
    async fn amounts_at_column_bounds_read_back_exactly() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;

        for amount in [MAX_AMOUNT, dec!(0.01), dec!(12345678.91)] {
            let stored = store
                .insert(&NewTransaction::new("Bound", amount, "2020-01-01"))
                .await?;
            let fetched = store.get_by_id(stored.id).await?.unwrap();
            assert_eq!(fetched.amount.to_string(), amount.to_string());
        }
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_never_reused() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;
        let tx = NewTransaction::new("Same", dec!(5.00), "2020-01-01");

        let first = store.insert(&tx).await?;
        let second = store.insert(&tx).await?;

        assert_ne!(first.id, second.id);
        Ok(())
    }

    #[tokio::test]
    async fn missing_id_is_none() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;
        assert_eq!(store.get_by_id(123).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_overlong_description_at_schema_level() -> anyhow::Result<()> {
        let store = SqliteTransactionStore::connect("sqlite::memory:").await?;
        let tx = NewTransaction::new(&"x".repeat(51), dec!(1.00), "2020-01-01");

        assert!(matches!(store.insert(&tx).await, Err(StoreError::Database(_))));
        Ok(())
    }
}
