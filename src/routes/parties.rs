use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        AddMemberRequest, CommonGamesResponse, CreatePartyRequest, CreatePartyResponse, Party,
        PartyId,
    },
    routes::AppState,
};

/// Registers a new party
pub async fn create_party(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CreatePartyRequest>,
) -> AppResult<(StatusCode, Json<CreatePartyResponse>)> {
    let member_count = request.members.len();
    let party_id = state.party_store.create(request.members).await?;

    tracing::info!(
        request_id = %request_id,
        party_id = %party_id,
        member_count,
        "Party created"
    );

    Ok((StatusCode::CREATED, Json(CreatePartyResponse { party_id })))
}

pub async fn get_party(
    State(state): State<AppState>,
    Path(party_id): Path<String>,
) -> AppResult<Json<Party>> {
    let party_id = PartyId::from(party_id);
    state
        .party_store
        .get(&party_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Party {} not found", party_id)))
}

/// Adds a member to a party, or confirms an existing membership
pub async fn add_member(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(party_id): Path<String>,
    Json(request): Json<AddMemberRequest>,
) -> AppResult<Json<Party>> {
    let party_id = PartyId::from(party_id);
    let party = state
        .party_store
        .add_member(&party_id, request.member_id.clone())
        .await?;

    tracing::info!(
        request_id = %request_id,
        party_id = %party_id,
        member_id = %request.member_id,
        member_count = party.members.len(),
        "Party membership updated"
    );

    Ok(Json(party))
}

/// Games owned by every party member whose library could be fetched
pub async fn common_games(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(party_id): Path<String>,
) -> AppResult<Json<CommonGamesResponse>> {
    let party_id = PartyId::from(party_id);
    tracing::info!(request_id = %request_id, party_id = %party_id, "Finding common games");

    let intersection = state.intersection.compute_common_games(&party_id).await?;

    Ok(Json(CommonGamesResponse::from(intersection)))
}
