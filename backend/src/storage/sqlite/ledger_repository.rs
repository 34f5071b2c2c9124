use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};

use super::{decimal_from_column, DbConnection};
use crate::domain::calendar::format_date;
use crate::domain::models::ledger_entry::LedgerEntry;
use crate::storage::traits::LedgerStorage;

const SELECT_ENTRIES: &str = r#"
    SELECT id, card_id, description, amount, date, installments, created_at, updated_at
    FROM card_ledger_entries
    WHERE card_id = ?
    ORDER BY date ASC, seq ASC
"#;

/// Repository for card ledger entries
#[derive(Clone)]
pub struct LedgerRepository {
    db: DbConnection,
}

impl LedgerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn insert_entries(
        conn: &mut SqliteConnection,
        card_id: &str,
        entries: &[LedgerEntry],
    ) -> Result<()> {
        for entry in entries {
            anyhow::ensure!(
                entry.card_id == card_id,
                "entry {} belongs to card {}, not {}",
                entry.id,
                entry.card_id,
                card_id
            );

            sqlx::query(
                r#"
                INSERT INTO card_ledger_entries
                    (id, card_id, description, amount, date, installments, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.id)
            .bind(&entry.card_id)
            .bind(&entry.description)
            .bind(entry.amount.to_string())
            .bind(format_date(entry.date))
            .bind(&entry.installment_label)
            .bind(&entry.created_at)
            .bind(&entry.updated_at)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Inserting ledger entry {}", entry.id))?;
        }
        Ok(())
    }

    async fn insert_then_select(
        conn: &mut SqliteConnection,
        card_id: &str,
        entries: &[LedgerEntry],
    ) -> Result<Vec<LedgerEntry>> {
        Self::insert_entries(&mut *conn, card_id, entries).await?;

        let rows = sqlx::query(SELECT_ENTRIES)
            .bind(card_id)
            .fetch_all(&mut *conn)
            .await?;
        rows.iter().map(Self::entry_from_row).collect()
    }

    fn entry_from_row(row: &SqliteRow) -> Result<LedgerEntry> {
        let amount: String = row.get("amount");
        let date: String = row.get("date");

        Ok(LedgerEntry {
            id: row.get("id"),
            card_id: row.get("card_id"),
            description: row.get("description"),
            amount: decimal_from_column(&amount, "amount")?,
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("Invalid ledger date: {}", date))?,
            installment_label: row.get("installments"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl LedgerStorage for LedgerRepository {
    async fn append_entries(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        if let Err(e) = Self::insert_entries(&mut tx, card_id, entries).await {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_entries(&self, card_id: &str) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query(SELECT_ENTRIES)
            .bind(card_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::entry_from_row).collect()
    }

    async fn append_and_list(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<Vec<LedgerEntry>> {
        // Insert and re-read inside one transaction so the read sees exactly
        // the committed ledger, or nothing is written at all.
        let mut tx = self.db.pool().begin().await?;
        let ledger = match Self::insert_then_select(&mut tx, card_id, entries).await {
            Ok(ledger) => ledger,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        tx.commit().await?;
        Ok(ledger)
    }

    async fn delete_entries(&self, card_id: &str) -> Result<usize> {
        let result = sqlx::query("DELETE FROM card_ledger_entries WHERE card_id = ?")
            .bind(card_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::card::CreditCard;
    use crate::storage::sqlite::CardRepository;
    use crate::storage::traits::CardStorage;
    use rust_decimal::Decimal;

    async fn setup_test() -> (LedgerRepository, CardRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let cards = CardRepository::new(db.clone());
        cards
            .store_card(&CreditCard {
                id: "card::a".to_string(),
                owner: "ana@example.com".to_string(),
                name: "A".to_string(),
                last_digits: "1234".to_string(),
                limit: Decimal::new(1000, 0),
                due_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                color: "#111111".to_string(),
                current_bill: Decimal::ZERO,
                next_bill: Decimal::ZERO,
                created_at: "2024-01-01T00:00:00Z".to_string(),
                updated_at: "2024-01-01T00:00:00Z".to_string(),
            })
            .await
            .expect("Failed to store test card");
        (LedgerRepository::new(db), cards)
    }

    fn entry(card_id: &str, date: &str, amount: Decimal, label: &str) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntry::generate_id(),
            card_id: card_id.to_string(),
            description: format!("entry {}", label),
            amount,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            installment_label: label.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_round_trip() {
        let (ledger, _cards) = setup_test().await;
        let third = Decimal::new(100, 0) / Decimal::new(3, 0);
        let entries = vec![
            entry("card::a", "2024-03-15", third, "3/3"),
            entry("card::a", "2024-01-15", third, "1/3"),
            entry("card::a", "2024-02-15", third, "2/3"),
        ];

        ledger.append_entries("card::a", &entries).await.unwrap();
        let listed = ledger.list_entries("card::a").await.unwrap();

        let labels: Vec<&str> = listed.iter().map(|e| e.installment_label.as_str()).collect();
        assert_eq!(labels, vec!["1/3", "2/3", "3/3"]);
        // Full decimal precision survives storage
        assert!(listed.iter().all(|e| e.amount == third));
        assert_eq!(listed[0], entries[1]);
    }

    #[tokio::test]
    async fn test_same_date_entries_keep_insertion_order() {
        let (ledger, _cards) = setup_test().await;
        ledger
            .append_entries("card::a", &[entry("card::a", "2024-01-15", Decimal::ONE, "first")])
            .await
            .unwrap();
        let listed = ledger
            .append_and_list("card::a", &[entry("card::a", "2024-01-15", Decimal::ONE, "second")])
            .await
            .unwrap();

        let labels: Vec<&str> = listed.iter().map(|e| e.installment_label.as_str()).collect();
        assert_eq!(labels, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failed_append_rolls_back_whole_batch() {
        let (ledger, _cards) = setup_test().await;
        let duplicate = entry("card::a", "2024-01-15", Decimal::ONE, "1/2");
        let batch = vec![
            entry("card::a", "2024-01-10", Decimal::ONE, "1/1"),
            duplicate.clone(),
            duplicate,
        ];

        assert!(ledger.append_and_list("card::a", &batch).await.is_err());
        assert!(ledger.list_entries("card::a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_to_unknown_card_fails() {
        let (ledger, _cards) = setup_test().await;
        let result = ledger
            .append_entries("card::missing", &[entry("card::missing", "2024-01-15", Decimal::ONE, "1/1")])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_deleting_card_cascades_to_ledger() {
        let (ledger, cards) = setup_test().await;
        ledger
            .append_entries("card::a", &[entry("card::a", "2024-01-15", Decimal::ONE, "1/1")])
            .await
            .unwrap();

        assert!(cards.delete_card("card::a").await.unwrap());
        assert!(ledger.list_entries("card::a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_entries() {
        let (ledger, _cards) = setup_test().await;
        ledger
            .append_entries(
                "card::a",
                &[
                    entry("card::a", "2024-01-15", Decimal::ONE, "1/2"),
                    entry("card::a", "2024-02-15", Decimal::ONE, "2/2"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(ledger.delete_entries("card::a").await.unwrap(), 2);
        assert_eq!(ledger.delete_entries("card::a").await.unwrap(), 0);
    }
}
