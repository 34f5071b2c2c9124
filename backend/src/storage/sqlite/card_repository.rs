use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decimal_from_column, DbConnection};
use crate::domain::calendar::format_date;
use crate::domain::models::card::CreditCard;
use crate::storage::traits::CardStorage;

const CARD_COLUMNS: &str = "id, owner, name, last_digits, credit_limit, due_date, color, \
                            current_bill, next_bill, created_at, updated_at";

/// Repository for credit cards
#[derive(Clone)]
pub struct CardRepository {
    db: DbConnection,
}

impl CardRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn card_from_row(row: &SqliteRow) -> Result<CreditCard> {
        let limit: String = row.get("credit_limit");
        let current_bill: String = row.get("current_bill");
        let next_bill: String = row.get("next_bill");
        let due_date: String = row.get("due_date");

        Ok(CreditCard {
            id: row.get("id"),
            owner: row.get("owner"),
            name: row.get("name"),
            last_digits: row.get("last_digits"),
            limit: decimal_from_column(&limit, "credit_limit")?,
            due_date: NaiveDate::parse_from_str(&due_date, "%Y-%m-%d")
                .with_context(|| format!("Invalid card due date: {}", due_date))?,
            color: row.get("color"),
            current_bill: decimal_from_column(&current_bill, "current_bill")?,
            next_bill: decimal_from_column(&next_bill, "next_bill")?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl CardStorage for CardRepository {
    async fn store_card(&self, card: &CreditCard) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO credit_cards
                (id, owner, name, last_digits, credit_limit, due_date, color,
                 current_bill, next_bill, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&card.id)
        .bind(&card.owner)
        .bind(&card.name)
        .bind(&card.last_digits)
        .bind(card.limit.to_string())
        .bind(format_date(card.due_date))
        .bind(&card.color)
        .bind(card.current_bill.to_string())
        .bind(card.next_bill.to_string())
        .bind(&card.created_at)
        .bind(&card.updated_at)
        .execute(self.db.pool())
        .await
        .with_context(|| format!("Storing card {}", card.id))?;
        Ok(())
    }

    async fn find_owned_card(&self, card_id: &str, owner: &str) -> Result<Option<CreditCard>> {
        let query = format!("SELECT {} FROM credit_cards WHERE id = ? AND owner = ?", CARD_COLUMNS);
        let row = sqlx::query(&query)
            .bind(card_id)
            .bind(owner)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::card_from_row).transpose()
    }

    async fn list_cards(&self, owner: &str) -> Result<Vec<CreditCard>> {
        let query = format!(
            "SELECT {} FROM credit_cards WHERE owner = ? ORDER BY name ASC, id ASC",
            CARD_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::card_from_row).collect()
    }

    async fn update_card(&self, card: &CreditCard) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE credit_cards
            SET name = ?, last_digits = ?, credit_limit = ?, due_date = ?, color = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&card.name)
        .bind(&card.last_digits)
        .bind(card.limit.to_string())
        .bind(format_date(card.due_date))
        .bind(&card.color)
        .bind(&card.updated_at)
        .bind(&card.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            bail!("card {} does not exist", card.id);
        }
        Ok(())
    }

    async fn update_bill_totals(&self, card_id: &str, current_bill: Decimal, next_bill: Decimal) -> Result<()> {
        let result = sqlx::query("UPDATE credit_cards SET current_bill = ?, next_bill = ? WHERE id = ?")
            .bind(current_bill.to_string())
            .bind(next_bill.to_string())
            .bind(card_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            bail!("card {} does not exist", card_id);
        }
        Ok(())
    }

    async fn delete_card(&self, card_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM credit_cards WHERE id = ?")
            .bind(card_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> CardRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        CardRepository::new(db)
    }

    fn card(id: &str, owner: &str, name: &str) -> CreditCard {
        CreditCard {
            id: id.to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            last_digits: "4321".to_string(),
            limit: Decimal::new(250075, 2),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            color: "#ff0000".to_string(),
            current_bill: Decimal::ZERO,
            next_bill: Decimal::ZERO,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_store_and_find_owned_card() {
        let repo = setup_test().await;
        let stored = card("card::a", "ana@example.com", "Visa");
        repo.store_card(&stored).await.unwrap();

        let found = repo.find_owned_card("card::a", "ana@example.com").await.unwrap();
        assert_eq!(found, Some(stored));

        let foreign = repo.find_owned_card("card::a", "bob@example.com").await.unwrap();
        assert!(foreign.is_none());

        let missing = repo.find_owned_card("card::zzz", "ana@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_cards_by_owner_sorted_by_name() {
        let repo = setup_test().await;
        repo.store_card(&card("card::1", "ana@example.com", "Visa")).await.unwrap();
        repo.store_card(&card("card::2", "ana@example.com", "Amex")).await.unwrap();
        repo.store_card(&card("card::3", "bob@example.com", "Elo")).await.unwrap();

        let names: Vec<String> = repo
            .list_cards("ana@example.com")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Amex", "Visa"]);
    }

    #[tokio::test]
    async fn test_update_bill_totals_overwrites() {
        let repo = setup_test().await;
        repo.store_card(&card("card::a", "ana@example.com", "Visa")).await.unwrap();

        repo.update_bill_totals("card::a", Decimal::new(80000, 2), Decimal::new(400, 0))
            .await
            .unwrap();
        repo.update_bill_totals("card::a", Decimal::new(1, 0), Decimal::new(2, 0))
            .await
            .unwrap();

        let found = repo.find_owned_card("card::a", "ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.current_bill, Decimal::new(1, 0));
        assert_eq!(found.next_bill, Decimal::new(2, 0));

        assert!(repo
            .update_bill_totals("card::missing", Decimal::ZERO, Decimal::ZERO)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_update_card_leaves_bills_alone() {
        let repo = setup_test().await;
        repo.store_card(&card("card::a", "ana@example.com", "Visa")).await.unwrap();
        repo.update_bill_totals("card::a", Decimal::new(10, 0), Decimal::new(20, 0))
            .await
            .unwrap();

        let mut changed = card("card::a", "ana@example.com", "Visa Gold");
        changed.updated_at = "2024-02-01T00:00:00.000Z".to_string();
        repo.update_card(&changed).await.unwrap();

        let found = repo.find_owned_card("card::a", "ana@example.com").await.unwrap().unwrap();
        assert_eq!(found.name, "Visa Gold");
        assert_eq!(found.updated_at, "2024-02-01T00:00:00.000Z");
        assert_eq!(found.current_bill, Decimal::new(10, 0));
        assert_eq!(found.next_bill, Decimal::new(20, 0));
    }

    #[tokio::test]
    async fn test_delete_card() {
        let repo = setup_test().await;
        repo.store_card(&card("card::a", "ana@example.com", "Visa")).await.unwrap();

        assert!(repo.delete_card("card::a").await.unwrap());
        assert!(!repo.delete_card("card::a").await.unwrap());
    }
}
