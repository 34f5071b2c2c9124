//! # REST API for bank accounts
//!
//! Accounts are scoped to the calling principal; a foreign account answers
//! 404. The bulk route stores every submitted account or none of them.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use shared::{BankAccount, BankTransaction, CreateAccountRequest, ImportAccountsRequest, UpdateAccountRequest};
use tracing::info;

use super::error::ApiResult;
use super::mappers::account_mapper::AccountMapper;
use super::mappers::bank_transaction_mapper::BankTransactionMapper;
use super::principal::Principal;
use crate::AppState;

/// List the caller's accounts, newest first
pub async fn list_accounts(
    State(state): State<AppState>,
    Principal(owner): Principal,
) -> ApiResult<Json<Vec<BankAccount>>> {
    info!("GET /api/accounts for {}", owner);

    let accounts = state.account_service.list_accounts(&owner).await?;
    Ok(Json(AccountMapper::to_dto_list(accounts)))
}

pub async fn create_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BankAccount>)> {
    let Json(request) = payload?;
    info!("POST /api/accounts - request: {:?}", request);

    let command = AccountMapper::to_create_command(request);
    let account = state.account_service.create_account(&owner, command).await?;
    Ok((StatusCode::CREATED, Json(AccountMapper::to_dto(account))))
}

pub async fn import_accounts(
    State(state): State<AppState>,
    Principal(owner): Principal,
    payload: Result<Json<ImportAccountsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<BankAccount>>)> {
    let Json(request) = payload?;
    info!("POST /api/accounts/bulk - {} accounts", request.accounts.len());

    let commands = request
        .accounts
        .into_iter()
        .map(AccountMapper::to_create_command)
        .collect();
    let accounts = state.account_service.import_accounts(&owner, commands).await?;
    Ok((StatusCode::CREATED, Json(AccountMapper::to_dto_list(accounts))))
}

pub async fn get_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(account_id): Path<String>,
) -> ApiResult<Json<BankAccount>> {
    info!("GET /api/accounts/{}", account_id);

    let account = state.account_service.get_account(&owner, &account_id).await?;
    Ok(Json(AccountMapper::to_dto(account)))
}

pub async fn update_account(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(account_id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> ApiResult<Json<BankAccount>> {
    let Json(request) = payload?;
    info!("PATCH /api/accounts/{} - request: {:?}", account_id, request);

    let command = AccountMapper::to_update_command(request);
    let account = state
        .account_service
        .update_account(&owner, &account_id, command)
        .await?;
    Ok(Json(AccountMapper::to_dto(account)))
}

/// Transactions of one account, newest first
pub async fn list_account_transactions(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(account_id): Path<String>,
) -> ApiResult<Json<Vec<BankTransaction>>> {
    info!("GET /api/accounts/{}/transactions", account_id);

    let transactions = state
        .bank_transaction_service
        .list_transactions(&owner, &account_id)
        .await?;
    Ok(Json(BankTransactionMapper::to_dto_list(transactions)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Clock, FixedClock};
    use crate::io::rest::error::ApiError;
    use crate::storage::MemoryConnection;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    const OWNER: &str = "ana@example.com";

    fn state() -> AppState {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()));
        AppState::new(&MemoryConnection::new(), clock)
    }

    fn principal(owner: &str) -> Principal {
        Principal(owner.to_string())
    }

    fn create_request(name: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.to_string(),
            bank: "Nubank".to_string(),
            currency: "brl".to_string(),
            country: "BR".to_string(),
            balance: Some(Decimal::new(50000, 2)),
        }
    }

    #[tokio::test]
    async fn test_create_get_and_list_accounts() {
        let state = state();
        let (status, Json(account)) = create_account(
            State(state.clone()),
            principal(OWNER),
            Ok(Json(create_request("Checking"))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(account.currency, "BRL");
        assert_eq!(account.balance, Decimal::new(50000, 2));

        let Json(fetched) = get_account(State(state.clone()), principal(OWNER), Path(account.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, account);

        let Json(mine) = list_accounts(State(state.clone()), principal(OWNER)).await.unwrap();
        assert_eq!(mine.len(), 1);
        let Json(theirs) = list_accounts(State(state.clone()), principal("bob@example.com"))
            .await
            .unwrap();
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn test_import_accounts_rejects_whole_batch() {
        let state = state();
        let mut bad = create_request("Savings");
        bad.currency = "reais".to_string();

        let result = import_accounts(
            State(state.clone()),
            principal(OWNER),
            Ok(Json(ImportAccountsRequest {
                accounts: vec![create_request("Checking"), bad],
            })),
        )
        .await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let Json(accounts) = list_accounts(State(state.clone()), principal(OWNER)).await.unwrap();
        assert!(accounts.is_empty());

        let (status, Json(imported)) = import_accounts(
            State(state.clone()),
            principal(OWNER),
            Ok(Json(ImportAccountsRequest {
                accounts: vec![create_request("Checking"), create_request("Savings")],
            })),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(imported.len(), 2);
    }

    #[tokio::test]
    async fn test_update_account_and_foreign_access() {
        let state = state();
        let (_, Json(account)) = create_account(
            State(state.clone()),
            principal(OWNER),
            Ok(Json(create_request("Checking"))),
        )
        .await
        .unwrap();

        let Json(updated) = update_account(
            State(state.clone()),
            principal(OWNER),
            Path(account.id.clone()),
            Ok(Json(UpdateAccountRequest {
                name: Some("Main".to_string()),
                ..Default::default()
            })),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Main");
        assert_eq!(updated.balance, account.balance);

        let foreign = update_account(
            State(state.clone()),
            principal("bob@example.com"),
            Path(account.id.clone()),
            Ok(Json(UpdateAccountRequest::default())),
        )
        .await;
        assert!(matches!(foreign, Err(ApiError::NotFound(_))));

        let foreign_listing =
            list_account_transactions(State(state.clone()), principal("bob@example.com"), Path(account.id)).await;
        assert!(matches!(foreign_listing, Err(ApiError::NotFound(_))));
    }
}
