use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::RecommendationResponse,
    routes::AppState,
};

/// Suggests one game similar to the given title
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(title): Path<String>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(request_id = %request_id, title = %title, "Processing recommendation request");

    let recommendation = state.recommendations.recommend(&title).await?;

    tracing::info!(
        request_id = %request_id,
        title = %recommendation.title,
        slug = ?recommendation.slug,
        found = recommendation.output.is_some(),
        "Recommendation served"
    );

    Ok(Json(RecommendationResponse::from(recommendation)))
}
