use shared::{
    BankTransaction as BankTransactionDto, BankTransactionType, CreateBankTransactionRequest,
    RecordBankTransactionResponse,
};

use crate::domain::calendar::{format_date, parse_calendar_date};
use crate::domain::commands::bank_transaction::{RecordBankTransactionCommand, RecordBankTransactionResult};
use crate::domain::errors::BillingResult;
use crate::domain::models::bank_transaction::{BankTransaction, BankTransactionKind};

pub struct BankTransactionMapper;

impl BankTransactionMapper {
    pub fn to_dto(domain: BankTransaction) -> BankTransactionDto {
        BankTransactionDto {
            id: domain.id,
            bank_account_id: domain.account_id,
            kind: Self::kind_to_dto(domain.kind),
            description: domain.description,
            amount: domain.amount,
            date: format_date(domain.date),
            category: domain.category,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(transactions: Vec<BankTransaction>) -> Vec<BankTransactionDto> {
        transactions.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_command(owner: &str, request: CreateBankTransactionRequest) -> BillingResult<RecordBankTransactionCommand> {
        Ok(RecordBankTransactionCommand {
            owner: owner.to_string(),
            date: parse_calendar_date(&request.date)?,
            account_id: request.bank_account_id,
            kind: Self::kind_to_domain(request.kind),
            description: request.description,
            amount: request.amount,
            category: request.category,
        })
    }

    pub fn result_to_dto(result: RecordBankTransactionResult) -> RecordBankTransactionResponse {
        RecordBankTransactionResponse {
            transaction: Self::to_dto(result.transaction),
            balance: result.balance,
        }
    }

    fn kind_to_dto(kind: BankTransactionKind) -> BankTransactionType {
        match kind {
            BankTransactionKind::Income => BankTransactionType::Income,
            BankTransactionKind::Expense => BankTransactionType::Expense,
        }
    }

    fn kind_to_domain(kind: BankTransactionType) -> BankTransactionKind {
        match kind {
            BankTransactionType::Income => BankTransactionKind::Income,
            BankTransactionType::Expense => BankTransactionKind::Expense,
        }
    }
}
