use shared::CreateCardTransactionRequest;

use crate::domain::calendar::parse_calendar_date;
use crate::domain::errors::BillingResult;
use crate::domain::models::purchase::PurchaseRecord;

pub struct PurchaseMapper;

impl PurchaseMapper {
    /// Convert an import row to a domain PurchaseRecord. Fails on an
    /// unparseable date; the installment label is checked by the expander.
    pub fn to_domain(dto: CreateCardTransactionRequest) -> BillingResult<PurchaseRecord> {
        Ok(PurchaseRecord {
            date: parse_calendar_date(&dto.date)?,
            card_id: dto.card_id,
            description: dto.description,
            amount: dto.amount,
            installment_label: dto.installments.trim().to_string(),
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        })
    }

    pub fn to_domain_list(dtos: Vec<CreateCardTransactionRequest>) -> BillingResult<Vec<PurchaseRecord>> {
        dtos.into_iter().map(Self::to_domain).collect()
    }
}
