use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{IdealResponse, LookupQuery},
    lookup::NutrientLookup,
    services,
    summary::{ideal_pfc, intake_guide},
};
use crate::{
    error::ServiceError,
    extract::AppQuery,
    state::AppState,
};

pub fn nutrient_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrients/lookup", get(lookup_preview))
        .route("/nutrients/ideal", get(ideal))
}

/// GET /nutrients/lookup?dish=カレーライス&servings=2
#[instrument(skip(state))]
pub async fn lookup_preview(
    State(state): State<AppState>,
    AppQuery(q): AppQuery<LookupQuery>,
) -> Result<Json<NutrientLookup>, ServiceError> {
    let result = services::preview(state.lookup.as_ref(), &q.dish, q.servings).await?;
    Ok(Json(result))
}

pub async fn ideal() -> Json<IdealResponse> {
    Json(IdealResponse {
        ideal: ideal_pfc(),
        guide: intake_guide(),
    })
}
