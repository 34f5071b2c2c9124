//! # REST API for bulk purchase import

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use shared::{ImportTransactionsRequest, ImportTransactionsResponse};
use tracing::{info, warn};

use super::error::ApiResult;
use super::mappers::ledger_entry_mapper::LedgerEntryMapper;
use super::mappers::purchase_mapper::PurchaseMapper;
use super::principal::Principal;
use crate::domain::commands::import::ImportBatchCommand;
use crate::AppState;

/// Import a batch of purchases onto the card named by the first record
pub async fn import_transactions(
    State(state): State<AppState>,
    Principal(owner): Principal,
    payload: Result<Json<ImportTransactionsRequest>, JsonRejection>,
) -> ApiResult<Json<ImportTransactionsResponse>> {
    let Json(request) = payload?;
    info!(
        "POST /api/transactions/bulk - {} transactions from {}",
        request.transactions.len(),
        owner
    );

    let card_id = request
        .transactions
        .first()
        .map(|purchase| purchase.card_id.clone())
        .unwrap_or_default();

    let command = ImportBatchCommand {
        owner,
        card_id,
        purchases: PurchaseMapper::to_domain_list(request.transactions)?,
    };

    let result = state.import_service.import_batch(command).await.map_err(|e| {
        warn!("Import failed: {}", e);
        e
    })?;

    Ok(Json(ImportTransactionsResponse {
        transactions: LedgerEntryMapper::to_dto_list(result.entries),
        current_bill: result.bill_state.current_bill,
        next_bill: result.bill_state.next_bill,
    }))
}
