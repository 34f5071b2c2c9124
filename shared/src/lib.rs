use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single billed occurrence on a credit card (one installment of a purchase)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardTransaction {
    pub id: String,
    /// ID of the card this entry is billed to
    pub card_id: String,
    pub description: String,
    /// Installment share of the original purchase
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Calendar date the installment is billed on (YYYY-MM-DD)
    pub date: String,
    /// Installment label in "k/total" form
    pub installments: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub updated_at: String,
}

/// One purchase submitted for import. Installment purchases carry a label
/// such as "1/3" and are expanded server-side into one entry per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardTransactionRequest {
    pub card_id: String,
    pub description: String,
    /// Full purchase amount
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Purchase date, either YYYY-MM-DD or RFC 3339
    pub date: String,
    /// "current/total", "1/1" for a purchase paid at once
    #[serde(alias = "installmentLabel")]
    pub installments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportTransactionsRequest {
    pub transactions: Vec<CreateCardTransactionRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportTransactionsResponse {
    /// Every ledger entry created by this import, installments included
    pub transactions: Vec<CreditCardTransaction>,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_bill: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub next_bill: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: String,
    /// Email of the user who owns the card
    pub owner: String,
    pub name: String,
    /// Last four digits printed on the card
    pub last_digits: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    /// Bill due date (YYYY-MM-DD)
    pub due_date: String,
    pub color: String,
    /// Sum of entries billed before the start of next month
    #[serde(with = "rust_decimal::serde::float")]
    pub current_bill: Decimal,
    /// Sum of entries billed from the start of next month onwards
    #[serde(with = "rust_decimal::serde::float")]
    pub next_bill: Decimal,
    pub created_at: String,
    pub updated_at: String,
    /// Ledger entries, newest first. Only populated by read endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<CreditCardTransaction>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub name: String,
    pub last_digits: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    /// YYYY-MM-DD or RFC 3339
    pub due_date: String,
    pub color: String,
}

/// Partial card update. Bill totals are derived and cannot be set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCardRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub last_digits: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit: Option<Decimal>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillTotalsResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub current_bill: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub next_bill: Decimal,
}

/// A bank account owned by a user. The balance moves with every recorded
/// bank transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub bank: String,
    /// ISO 4217 code, upper case
    pub currency: String,
    pub country: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub bank: String,
    pub currency: String,
    pub country: String,
    /// Opening balance, zero when omitted
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
}

/// Several accounts created together; either all are stored or none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAccountsRequest {
    pub accounts: Vec<CreateAccountRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Manual balance correction
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankTransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBankTransactionRequest {
    pub bank_account_id: String,
    #[serde(rename = "type")]
    pub kind: BankTransactionType,
    pub description: String,
    /// Always positive; the type decides the direction
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// YYYY-MM-DD or RFC 3339
    pub date: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub id: String,
    pub bank_account_id: String,
    #[serde(rename = "type")]
    pub kind: BankTransactionType,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: String,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBankTransactionResponse {
    pub transaction: BankTransaction,
    /// Account balance after the transaction
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
