use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{decimal_from_column, DbConnection};
use crate::domain::calendar::format_date;
use crate::domain::models::bank_transaction::{BankTransaction, BankTransactionKind};
use crate::storage::traits::BankTransactionStorage;

/// Repository for bank account transactions
#[derive(Clone)]
pub struct BankTransactionRepository {
    db: DbConnection,
}

impl BankTransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn insert_and_move_balance(
        conn: &mut SqliteConnection,
        transaction: &BankTransaction,
        previous_balance: Decimal,
        new_balance: Decimal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bank_transactions
                (id, account_id, kind, description, amount, date, category, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.account_id)
        .bind(transaction.kind.as_str())
        .bind(&transaction.description)
        .bind(transaction.amount.to_string())
        .bind(format_date(transaction.date))
        .bind(&transaction.category)
        .bind(&transaction.created_at)
        .bind(&transaction.updated_at)
        .execute(&mut *conn)
        .await
        .with_context(|| format!("Inserting bank transaction {}", transaction.id))?;

        // Compare-and-set: only moves the balance the caller read
        let result = sqlx::query(
            "UPDATE bank_accounts SET balance = ?, updated_at = ? WHERE id = ? AND balance = ?",
        )
        .bind(new_balance.to_string())
        .bind(&transaction.created_at)
        .bind(&transaction.account_id)
        .bind(previous_balance.to_string())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            bail!(
                "balance of account {} is no longer {}",
                transaction.account_id,
                previous_balance
            );
        }
        Ok(())
    }

    fn transaction_from_row(row: &SqliteRow) -> Result<BankTransaction> {
        let kind: String = row.get("kind");
        let amount: String = row.get("amount");
        let date: String = row.get("date");

        Ok(BankTransaction {
            id: row.get("id"),
            account_id: row.get("account_id"),
            kind: BankTransactionKind::parse(&kind)
                .ok_or_else(|| anyhow!("Invalid bank transaction kind: {}", kind))?,
            description: row.get("description"),
            amount: decimal_from_column(&amount, "amount")?,
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid bank transaction date: {}", date))?,
            category: row.get("category"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl BankTransactionStorage for BankTransactionRepository {
    async fn record_transaction(
        &self,
        transaction: &BankTransaction,
        previous_balance: Decimal,
        new_balance: Decimal,
    ) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        if let Err(e) = Self::insert_and_move_balance(&mut tx, transaction, previous_balance, new_balance).await {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_transactions(&self, account_id: &str) -> Result<Vec<BankTransaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, account_id, kind, description, amount, date, category, created_at, updated_at
            FROM bank_transactions
            WHERE account_id = ?
            ORDER BY date DESC, seq DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::transaction_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::account::BankAccount;
    use crate::storage::sqlite::AccountRepository;
    use crate::storage::traits::AccountStorage;

    async fn setup_test(opening_balance: Decimal) -> (BankTransactionRepository, AccountRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let accounts = AccountRepository::new(db.clone());
        accounts
            .store_account(&BankAccount {
                id: "account::a".to_string(),
                owner: "ana@example.com".to_string(),
                name: "Checking".to_string(),
                bank: "Inter".to_string(),
                currency: "BRL".to_string(),
                country: "BR".to_string(),
                balance: opening_balance,
                created_at: "2024-01-01T00:00:00Z".to_string(),
                updated_at: "2024-01-01T00:00:00Z".to_string(),
            })
            .await
            .expect("Failed to store test account");
        (BankTransactionRepository::new(db), accounts)
    }

    fn transaction(kind: BankTransactionKind, date: &str, amount: Decimal) -> BankTransaction {
        BankTransaction {
            id: BankTransaction::generate_id(),
            account_id: "account::a".to_string(),
            kind,
            description: format!("{} on {}", kind.as_str(), date),
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category: "misc".to_string(),
            created_at: "2024-02-01T00:00:00Z".to_string(),
            updated_at: "2024-02-01T00:00:00Z".to_string(),
        }
    }

    async fn balance(accounts: &AccountRepository) -> Decimal {
        accounts
            .find_owned_account("account::a", "ana@example.com")
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    #[tokio::test]
    async fn test_record_transaction_updates_balance() {
        let (transactions, accounts) = setup_test(Decimal::new(10000, 2)).await;

        let income = transaction(BankTransactionKind::Income, "2024-01-10", Decimal::new(5050, 2));
        transactions
            .record_transaction(&income, Decimal::new(10000, 2), Decimal::new(15050, 2))
            .await
            .unwrap();
        assert_eq!(balance(&accounts).await, Decimal::new(15050, 2));

        let expense = transaction(BankTransactionKind::Expense, "2024-01-12", Decimal::new(50, 0));
        transactions
            .record_transaction(&expense, Decimal::new(15050, 2), Decimal::new(10050, 2))
            .await
            .unwrap();
        assert_eq!(balance(&accounts).await, Decimal::new(10050, 2));

        let listed = transactions.list_transactions("account::a").await.unwrap();
        assert_eq!(listed, vec![expense, income]);
    }

    #[tokio::test]
    async fn test_stale_balance_writes_nothing() {
        let (transactions, accounts) = setup_test(Decimal::new(100, 0)).await;

        let expense = transaction(BankTransactionKind::Expense, "2024-01-10", Decimal::new(30, 0));
        let stale = transactions
            .record_transaction(&expense, Decimal::new(90, 0), Decimal::new(60, 0))
            .await;
        assert!(stale.is_err());

        assert!(transactions.list_transactions("account::a").await.unwrap().is_empty());
        assert_eq!(balance(&accounts).await, Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn test_unknown_account_is_rejected() {
        let (transactions, _accounts) = setup_test(Decimal::ZERO).await;

        let mut orphan = transaction(BankTransactionKind::Income, "2024-01-10", Decimal::new(1, 0));
        orphan.account_id = "account::missing".to_string();
        assert!(transactions
            .record_transaction(&orphan, Decimal::ZERO, Decimal::new(1, 0))
            .await
            .is_err());
        assert!(transactions
            .list_transactions("account::missing")
            .await
            .unwrap()
            .is_empty());
    }
}
