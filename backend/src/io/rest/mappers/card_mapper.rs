use shared::{BillTotalsResponse, CreateCardRequest, CreditCard as CreditCardDto, UpdateCardRequest};

use super::ledger_entry_mapper::LedgerEntryMapper;
use crate::domain::calendar::{format_date, parse_calendar_date};
use crate::domain::commands::card::{CreateCardCommand, UpdateCardCommand};
use crate::domain::errors::BillingResult;
use crate::domain::models::card::{CardBillState, CardWithLedger, CreditCard};

pub struct CardMapper;

impl CardMapper {
    /// Convert domain CreditCard to the shared DTO, without its ledger
    pub fn to_dto(domain: CreditCard) -> CreditCardDto {
        CreditCardDto {
            id: domain.id,
            owner: domain.owner,
            name: domain.name,
            last_digits: domain.last_digits,
            limit: domain.limit,
            due_date: format_date(domain.due_date),
            color: domain.color,
            current_bill: domain.current_bill,
            next_bill: domain.next_bill,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
            transactions: None,
        }
    }

    /// Convert a card with its ledger; entries keep their newest-first order
    pub fn with_ledger_to_dto(domain: CardWithLedger) -> CreditCardDto {
        let mut dto = Self::to_dto(domain.card);
        dto.transactions = Some(LedgerEntryMapper::to_dto_list(domain.entries));
        dto
    }

    pub fn to_create_command(request: CreateCardRequest) -> BillingResult<CreateCardCommand> {
        Ok(CreateCardCommand {
            due_date: parse_calendar_date(&request.due_date)?,
            name: request.name,
            last_digits: request.last_digits,
            limit: request.limit,
            color: request.color,
        })
    }

    pub fn to_update_command(request: UpdateCardRequest) -> BillingResult<UpdateCardCommand> {
        let due_date = request
            .due_date
            .as_deref()
            .map(parse_calendar_date)
            .transpose()?;

        Ok(UpdateCardCommand {
            name: request.name,
            last_digits: request.last_digits,
            limit: request.limit,
            due_date,
            color: request.color,
        })
    }

    pub fn bill_totals_to_dto(state: CardBillState) -> BillTotalsResponse {
        BillTotalsResponse {
            current_bill: state.current_bill,
            next_bill: state.next_bill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_update_command_parses_optional_due_date() {
        let command = CardMapper::to_update_command(UpdateCardRequest {
            due_date: Some("2024-04-10".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(command.due_date, NaiveDate::from_ymd_opt(2024, 4, 10));
        assert!(command.name.is_none());

        let empty = CardMapper::to_update_command(UpdateCardRequest::default()).unwrap();
        assert!(empty.due_date.is_none());

        assert!(CardMapper::to_update_command(UpdateCardRequest {
            due_date: Some("soon".to_string()),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn test_with_ledger_to_dto_includes_transactions() {
        let card = CreditCard {
            id: "card::1".to_string(),
            owner: "ana@example.com".to_string(),
            name: "Visa".to_string(),
            last_digits: "1234".to_string(),
            limit: Decimal::new(5000, 0),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            color: "#000000".to_string(),
            current_bill: Decimal::ZERO,
            next_bill: Decimal::ZERO,
            created_at: "2024-02-10T00:00:00.000Z".to_string(),
            updated_at: "2024-02-10T00:00:00.000Z".to_string(),
        };

        let plain = CardMapper::to_dto(card.clone());
        assert_eq!(plain.due_date, "2024-02-15");
        assert!(plain.transactions.is_none());

        let full = CardMapper::with_ledger_to_dto(CardWithLedger { card, entries: Vec::new() });
        assert_eq!(full.transactions, Some(Vec::new()));
    }
}
