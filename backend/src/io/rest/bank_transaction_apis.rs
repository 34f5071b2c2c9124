//! # REST API for bank transactions

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use shared::{CreateBankTransactionRequest, RecordBankTransactionResponse};
use tracing::info;

use super::error::ApiResult;
use super::mappers::bank_transaction_mapper::BankTransactionMapper;
use super::principal::Principal;
use crate::AppState;

/// Record an income or expense and return the account's new balance
pub async fn create_bank_transaction(
    State(state): State<AppState>,
    Principal(owner): Principal,
    payload: Result<Json<CreateBankTransactionRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RecordBankTransactionResponse>)> {
    let Json(request) = payload?;
    info!("POST /api/transactions - request: {:?}", request);

    let command = BankTransactionMapper::to_command(&owner, request)?;
    let result = state.bank_transaction_service.record_transaction(command).await?;
    Ok((StatusCode::CREATED, Json(BankTransactionMapper::result_to_dto(result))))
}
