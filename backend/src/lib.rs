//! # Card Ledger Backend
//!
//! Server side of the credit-card ledger: users register cards, bulk-import
//! purchases (expanded into monthly installments) and read back each card's
//! ledger with its current and next bill. Bank accounts sit alongside the
//! cards, with income and expense transactions that move their balance.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers, DTO mappers)
//!     ↓
//! Domain Layer (installment expansion, bill aggregation, services)
//!     ↓
//! Storage Layer (SQLite via sqlx, in-memory)
//! ```
//!
//! The domain layer never reads the wall clock or a concrete store directly;
//! both are injected through [`domain::Clock`] and [`storage::Connection`].

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    AccountService, BankTransactionService, CardService, Clock, ImportService, LedgerLocks, SystemClock,
};
use crate::storage::{Connection, DbConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub import_service: ImportService,
    pub card_service: CardService,
    pub account_service: AccountService,
    pub bank_transaction_service: BankTransactionService,
}

impl AppState {
    /// Wire the services over one connection. All services share the same
    /// ledger locks, so writes to one card or one account never interleave.
    pub fn new<C: Connection>(connection: &C, clock: Arc<dyn Clock>) -> Self {
        let ledger_locks = LedgerLocks::new();
        Self {
            import_service: ImportService::new(connection, clock.clone(), ledger_locks.clone()),
            card_service: CardService::new(connection, clock.clone(), ledger_locks.clone()),
            account_service: AccountService::new(connection, clock.clone(), ledger_locks.clone()),
            bank_transaction_service: BankTransactionService::new(connection, clock, ledger_locks),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = DbConnection::new(&config.database_url).await?;

    info!("Setting up application state");
    Ok(AppState::new(&db_conn, Arc::new(SystemClock)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/transactions/bulk", post(io::import_transactions))
        .route("/cards", get(io::list_cards).post(io::create_card))
        .route(
            "/cards/:id",
            get(io::get_card).put(io::update_card).delete(io::delete_card),
        )
        .route("/cards/:id/bills/refresh", post(io::refresh_bills))
        .route("/transactions", post(io::create_bank_transaction))
        .route("/accounts", get(io::list_accounts).post(io::create_account))
        .route("/accounts/bulk", post(io::import_accounts))
        .route("/accounts/:id", get(io::get_account).patch(io::update_account))
        .route("/accounts/:id/transactions", get(io::list_account_transactions));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
