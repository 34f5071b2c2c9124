//! Current/next bill aggregation over a card's ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::calendar::next_month_boundary;
use super::errors::{BillingError, BillingResult};
use super::models::card::CardBillState;
use super::models::ledger_entry::LedgerEntry;

/// Split the whole ledger at the first day of next month. Everything dated
/// before the boundary, however old, is the current bill; everything on or
/// after it, however far ahead, is the next bill.
///
/// Fails with `Validation` when a total leaves the range `Decimal` can hold.
pub fn compute_bill_state<'a, I>(entries: I, today: NaiveDate) -> BillingResult<CardBillState>
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let boundary = next_month_boundary(today);

    entries.into_iter().try_fold(
        CardBillState {
            current_bill: Decimal::ZERO,
            next_bill: Decimal::ZERO,
        },
        |mut state, entry| {
            let bucket = if entry.date < boundary {
                &mut state.current_bill
            } else {
                &mut state.next_bill
            };
            *bucket = bucket.checked_add(entry.amount).ok_or_else(|| {
                BillingError::validation(format!(
                    "Bill total for card {} exceeds the supported amount range",
                    entry.card_id
                ))
            })?;
            Ok(state)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(amount: Decimal, entry_date: NaiveDate) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntry::generate_id(),
            card_id: "card::test".to_string(),
            description: "entry".to_string(),
            amount,
            date: entry_date,
            installment_label: "1/1".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_empty_ledger() {
        let entries: Vec<LedgerEntry> = Vec::new();
        let state = compute_bill_state(&entries, date(2024, 2, 10)).unwrap();
        assert_eq!(state.current_bill, Decimal::ZERO);
        assert_eq!(state.next_bill, Decimal::ZERO);
    }

    #[test]
    fn test_boundary_is_first_of_next_month() {
        let entries = vec![
            entry(Decimal::new(10, 0), date(2024, 2, 29)),
            entry(Decimal::new(20, 0), date(2024, 3, 1)),
        ];
        let state = compute_bill_state(&entries, date(2024, 2, 10)).unwrap();
        assert_eq!(state.current_bill, Decimal::new(10, 0));
        assert_eq!(state.next_bill, Decimal::new(20, 0));
    }

    #[test]
    fn test_far_past_and_far_future_collapse_into_two_buckets() {
        let entries = vec![
            entry(Decimal::new(5, 0), date(2019, 6, 1)),
            entry(Decimal::new(7, 0), date(2024, 2, 1)),
            entry(Decimal::new(11, 0), date(2024, 4, 15)),
            entry(Decimal::new(13, 0), date(2031, 1, 1)),
        ];
        let state = compute_bill_state(&entries, date(2024, 2, 10)).unwrap();
        assert_eq!(state.current_bill, Decimal::new(12, 0));
        assert_eq!(state.next_bill, Decimal::new(24, 0));
    }

    #[test]
    fn test_partition_is_complete() {
        let entries: Vec<LedgerEntry> = (0..40)
            .map(|i| entry(Decimal::new(i * 125, 2), date(2023, 1, 1) + chrono::Days::new(i as u64 * 17)))
            .collect();
        let total: Decimal = entries.iter().map(|e| e.amount).sum();

        for today in [date(2023, 1, 1), date(2023, 6, 30), date(2024, 12, 31)] {
            let state = compute_bill_state(&entries, today).unwrap();
            assert_eq!(state.current_bill + state.next_bill, total);
        }
    }

    #[test]
    fn test_negative_entries_reduce_the_bill() {
        let entries = vec![
            entry(Decimal::new(100, 0), date(2024, 2, 1)),
            entry(Decimal::new(-30, 0), date(2024, 2, 5)),
        ];
        let state = compute_bill_state(&entries, date(2024, 2, 10)).unwrap();
        assert_eq!(state.current_bill, Decimal::new(70, 0));
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let entries = vec![entry(huge, date(2024, 2, 1)), entry(huge, date(2024, 2, 2))];

        let result = compute_bill_state(&entries, date(2024, 2, 10));
        assert!(matches!(result, Err(BillingError::Validation(_))));

        // Split across the two buckets each total still fits
        let split = vec![entry(huge, date(2024, 2, 1)), entry(huge, date(2024, 3, 2))];
        let state = compute_bill_state(&split, date(2024, 2, 10)).unwrap();
        assert_eq!(state.current_bill, huge);
        assert_eq!(state.next_bill, huge);
    }
}
