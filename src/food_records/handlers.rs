use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{instrument, warn};

use super::{
    dto::{
        CreateFoodRecordRequest, DailySummaryResponse, DateQuery, FoodRecordResponse,
        NutrientInput, OptionalDateQuery,
    },
    services,
};
use crate::{
    error::ServiceError,
    extract::{AppJson, AppPath, AppQuery},
    state::AppState,
};

pub fn food_record_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:username/food_records",
            get(list_food_records).post(create_food_record),
        )
        .route(
            "/users/:username/food_records/",
            get(list_food_records).post(create_food_record),
        )
        .route("/users/:username/summary", get(daily_summary))
        .route("/users/:username/summary/", get(daily_summary))
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}

/// GET /users/{username}/food_records/?date=YYYY-MM-DD
#[instrument(skip(state))]
pub async fn list_food_records(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppQuery(q): AppQuery<DateQuery>,
) -> Result<Json<Vec<FoodRecordResponse>>, ServiceError> {
    let records = services::list_food_records(&state.db, &username, q.date).await?;
    Ok(Json(records.into_iter().map(FoodRecordResponse::from).collect()))
}

/// POST /users/{username}/food_records/
/// Body: {recipe_name, servings, date?, energy?, protein?, fat?, carbohydrate?}
#[instrument(skip(state))]
pub async fn create_food_record(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppJson(body): AppJson<CreateFoodRecordRequest>,
) -> Result<(StatusCode, Json<FoodRecordResponse>), ServiceError> {
    let date = body.date.unwrap_or_else(today);
    let record = match body.nutrients() {
        NutrientInput::Lookup => {
            services::record_meal(
                &state.db,
                state.lookup.as_ref(),
                &username,
                date,
                &body.recipe_name,
                body.servings,
            )
            .await?
        }
        NutrientInput::Given(totals) => {
            services::create_food_record(
                &state.db,
                &username,
                date,
                &body.recipe_name,
                body.servings,
                totals,
            )
            .await?
        }
        NutrientInput::Partial => {
            warn!("partial nutrient values");
            return Err(ServiceError::Validation(
                "give all of energy, protein, fat and carbohydrate, or none of them".into(),
            ));
        }
    };
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /users/{username}/summary/?date=YYYY-MM-DD (defaults to today)
#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    AppQuery(q): AppQuery<OptionalDateQuery>,
) -> Result<Json<DailySummaryResponse>, ServiceError> {
    let date = q.date.unwrap_or_else(today);
    let summary = services::daily_summary(&state.db, &username, date).await?;
    Ok(Json(summary.into()))
}
