//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services.
//!
//! ## Key Responsibilities
//!
//! - **API Endpoints**: REST endpoints under `/api`
//! - **Data Serialization**: converting between the `shared` DTOs and domain models
//! - **Error Translation**: mapping domain errors onto HTTP status codes
//! - **Principal Extraction**: reading the authenticated user from the request
//!
//! ## Supported Operations
//!
//! - **POST /api/transactions/bulk**: import purchases onto a card
//! - **GET/POST /api/cards**: list and register cards
//! - **GET/PUT/DELETE /api/cards/:id**: read, update and delete one card
//! - **POST /api/cards/:id/bills/refresh**: recompute a card's bills for today
//! - **GET/POST /api/accounts**: list and open bank accounts
//! - **POST /api/accounts/bulk**: open several accounts at once
//! - **GET/PATCH /api/accounts/:id**: read and edit one account
//! - **GET /api/accounts/:id/transactions**: an account's movements
//! - **POST /api/transactions**: record an income or expense on an account

pub mod rest;

pub use rest::*;
