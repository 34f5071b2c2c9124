//! # REST API for card management
//!
//! Every endpoint is scoped to the calling principal. A card owned by
//! someone else answers 404, the same as a card that does not exist.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use shared::{BillTotalsResponse, CreateCardRequest, CreditCard, UpdateCardRequest};
use tracing::info;

use super::error::ApiResult;
use super::mappers::card_mapper::CardMapper;
use super::principal::Principal;
use crate::AppState;

/// List the caller's cards, each with its ledger
pub async fn list_cards(
    State(state): State<AppState>,
    Principal(owner): Principal,
) -> ApiResult<Json<Vec<CreditCard>>> {
    info!("GET /api/cards for {}", owner);

    let cards = state.card_service.list_cards(&owner).await?;
    Ok(Json(cards.into_iter().map(CardMapper::with_ledger_to_dto).collect()))
}

pub async fn create_card(
    State(state): State<AppState>,
    Principal(owner): Principal,
    payload: Result<Json<CreateCardRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreditCard>)> {
    let Json(request) = payload?;
    info!("POST /api/cards - request: {:?}", request);

    let command = CardMapper::to_create_command(request)?;
    let card = state.card_service.create_card(&owner, command).await?;
    Ok((StatusCode::CREATED, Json(CardMapper::to_dto(card))))
}

pub async fn get_card(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(card_id): Path<String>,
) -> ApiResult<Json<CreditCard>> {
    info!("GET /api/cards/{}", card_id);

    let card = state.card_service.get_card(&owner, &card_id).await?;
    Ok(Json(CardMapper::with_ledger_to_dto(card)))
}

pub async fn update_card(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(card_id): Path<String>,
    payload: Result<Json<UpdateCardRequest>, JsonRejection>,
) -> ApiResult<Json<CreditCard>> {
    let Json(request) = payload?;
    info!("PUT /api/cards/{} - request: {:?}", card_id, request);

    let command = CardMapper::to_update_command(request)?;
    let card = state.card_service.update_card(&owner, &card_id, command).await?;
    Ok(Json(CardMapper::to_dto(card)))
}

/// Delete a card together with its ledger
pub async fn delete_card(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(card_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /api/cards/{}", card_id);

    state.card_service.delete_card(&owner, &card_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recompute the card's bills against today's date
pub async fn refresh_bills(
    State(state): State<AppState>,
    Principal(owner): Principal,
    Path(card_id): Path<String>,
) -> ApiResult<Json<BillTotalsResponse>> {
    info!("POST /api/cards/{}/bills/refresh", card_id);

    let bill_state = state.card_service.refresh_bills(&owner, &card_id).await?;
    Ok(Json(CardMapper::bill_totals_to_dto(bill_state)))
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
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()));
        AppState::new(&MemoryConnection::new(), clock)
    }

    fn principal(owner: &str) -> Principal {
        Principal(owner.to_string())
    }

    fn create_request(name: &str) -> CreateCardRequest {
        CreateCardRequest {
            name: name.to_string(),
            last_digits: "4321".to_string(),
            limit: Decimal::new(2500, 0),
            due_date: "2024-02-20".to_string(),
            color: "#16a34a".to_string(),
        }
    }

    async fn create(state: &AppState, owner: &str, name: &str) -> CreditCard {
        let (status, Json(card)) = create_card(
            State(state.clone()),
            principal(owner),
            Ok(Json(create_request(name))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        card
    }

    #[tokio::test]
    async fn test_create_and_list_cards() {
        let state = state();
        create(&state, OWNER, "Visa").await;
        create(&state, OWNER, "Amex").await;
        create(&state, "bob@example.com", "Elo").await;

        let Json(cards) = list_cards(State(state.clone()), principal(OWNER)).await.unwrap();
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Amex", "Visa"]);
        assert!(cards.iter().all(|c| c.transactions == Some(Vec::new())));
        assert!(cards.iter().all(|c| c.due_date == "2024-02-20"));
    }

    #[tokio::test]
    async fn test_create_card_rejects_bad_input() {
        let state = state();
        let mut request = create_request("Visa");
        request.due_date = "next week".to_string();

        let result = create_card(State(state.clone()), principal(OWNER), Ok(Json(request))).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_update_delete_card() {
        let state = state();
        let card = create(&state, OWNER, "Visa").await;

        let Json(fetched) = get_card(State(state.clone()), principal(OWNER), Path(card.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched.id, card.id);

        let Json(updated) = update_card(
            State(state.clone()),
            principal(OWNER),
            Path(card.id.clone()),
            Ok(Json(UpdateCardRequest {
                color: Some("#dc2626".to_string()),
                ..Default::default()
            })),
        )
        .await
        .unwrap();
        assert_eq!(updated.color, "#dc2626");
        assert_eq!(updated.name, "Visa");

        let status = delete_card(State(state.clone()), principal(OWNER), Path(card.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let missing = get_card(State(state.clone()), principal(OWNER), Path(card.id)).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_other_owner_cannot_touch_card() {
        let state = state();
        let card = create(&state, OWNER, "Visa").await;

        let result = delete_card(State(state.clone()), principal("bob@example.com"), Path(card.id.clone())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = refresh_bills(State(state.clone()), principal("bob@example.com"), Path(card.id)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_refresh_bills_of_empty_card() {
        let state = state();
        let card = create(&state, OWNER, "Visa").await;

        let Json(totals) = refresh_bills(State(state.clone()), principal(OWNER), Path(card.id))
            .await
            .unwrap();
        assert_eq!(totals.current_bill, Decimal::ZERO);
        assert_eq!(totals.next_bill, Decimal::ZERO);
    }
}
