use shared::CreditCardTransaction;

use crate::domain::calendar::format_date;
use crate::domain::models::ledger_entry::LedgerEntry;

pub struct LedgerEntryMapper;

impl LedgerEntryMapper {
    /// Convert domain LedgerEntry to shared CreditCardTransaction DTO
    pub fn to_dto(domain: LedgerEntry) -> CreditCardTransaction {
        CreditCardTransaction {
            id: domain.id,
            card_id: domain.card_id,
            description: domain.description,
            amount: domain.amount,
            date: format_date(domain.date),
            installments: domain.installment_label,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(entries: Vec<LedgerEntry>) -> Vec<CreditCardTransaction> {
        entries.into_iter().map(Self::to_dto).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_to_dto_formats_date_and_label() {
        let entry = LedgerEntry {
            id: "entry::1".to_string(),
            card_id: "card::1".to_string(),
            description: "TV".to_string(),
            amount: Decimal::new(40000, 2),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            installment_label: "3/3".to_string(),
            created_at: "2024-02-10T00:00:00.000Z".to_string(),
            updated_at: "2024-02-10T00:00:00.000Z".to_string(),
        };

        let dto = LedgerEntryMapper::to_dto(entry);
        assert_eq!(dto.date, "2024-03-05");
        assert_eq!(dto.installments, "3/3");
        assert_eq!(dto.amount, Decimal::new(400, 0));
    }
}
