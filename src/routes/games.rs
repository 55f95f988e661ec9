use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{error::AppResult, routes::AppState};

/// Game detail document from the search service, passed through unchanged
pub async fn game_details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let details = state.game_search.game_details(&slug).await?;
    Ok(Json(details))
}
