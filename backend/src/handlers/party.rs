//! HTTP handlers for the party master

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::party::{CreatePartyInput, PartyService, UpdatePartyInput};
use crate::AppState;

/// Create a party
pub async fn create_party(
    State(state): State<AppState>,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<impl IntoResponse> {
    let service = PartyService::new(state.db);
    let party = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(party)))
}

/// Get a party by ID
pub async fn get_party(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = PartyService::new(state.db);
    let party = service.get(party_id).await?;
    Ok(Json(party))
}

/// List all parties
pub async fn list_parties(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = PartyService::new(state.db);
    let parties = service.list().await?;
    Ok(Json(parties))
}

/// Update a party
pub async fn update_party(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
    Json(input): Json<UpdatePartyInput>,
) -> AppResult<impl IntoResponse> {
    let service = PartyService::new(state.db);
    let party = service.update(party_id, input).await?;
    Ok(Json(party))
}

/// Delete a party
pub async fn delete_party(
    State(state): State<AppState>,
    Path(party_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let service = PartyService::new(state.db);
    service.delete(party_id).await?;
    Ok(Json(()))
}
