use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{decimal_from_column, DbConnection};
use crate::domain::models::account::BankAccount;
use crate::storage::traits::AccountStorage;

const ACCOUNT_COLUMNS: &str = "id, owner, name, bank, currency, country, balance, created_at, updated_at";

/// Repository for bank accounts
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn insert_account(conn: &mut SqliteConnection, account: &BankAccount) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bank_accounts
                (id, owner, name, bank, currency, country, balance, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.owner)
        .bind(&account.name)
        .bind(&account.bank)
        .bind(&account.currency)
        .bind(&account.country)
        .bind(account.balance.to_string())
        .bind(&account.created_at)
        .bind(&account.updated_at)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Storing account {}", account.id))?;
        Ok(())
    }

    fn account_from_row(row: &SqliteRow) -> Result<BankAccount> {
        let balance: String = row.get("balance");

        Ok(BankAccount {
            id: row.get("id"),
            owner: row.get("owner"),
            name: row.get("name"),
            bank: row.get("bank"),
            currency: row.get("currency"),
            country: row.get("country"),
            balance: decimal_from_column(&balance, "balance")?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl AccountStorage for AccountRepository {
    async fn store_account(&self, account: &BankAccount) -> Result<()> {
        let mut conn = self.db.pool().acquire().await?;
        Self::insert_account(&mut conn, account).await
    }

    async fn store_accounts(&self, accounts: &[BankAccount]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for account in accounts {
            if let Err(e) = Self::insert_account(&mut tx, account).await {
                tx.rollback().await?;
                return Err(e);
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_owned_account(&self, account_id: &str, owner: &str) -> Result<Option<BankAccount>> {
        let query = format!("SELECT {} FROM bank_accounts WHERE id = ? AND owner = ?", ACCOUNT_COLUMNS);
        let row = sqlx::query(&query)
            .bind(account_id)
            .bind(owner)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::account_from_row).transpose()
    }

    async fn list_accounts(&self, owner: &str) -> Result<Vec<BankAccount>> {
        let query = format!(
            "SELECT {} FROM bank_accounts WHERE owner = ? ORDER BY created_at DESC, rowid DESC",
            ACCOUNT_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::account_from_row).collect()
    }

    async fn update_account(&self, account: &BankAccount) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE bank_accounts
            SET name = ?, bank = ?, currency = ?, country = ?, balance = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&account.name)
        .bind(&account.bank)
        .bind(&account.currency)
        .bind(&account.country)
        .bind(account.balance.to_string())
        .bind(&account.updated_at)
        .bind(&account.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            bail!("account {} does not exist", account.id);
        }
        Ok(())
    }
}
