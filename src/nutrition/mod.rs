mod dto;
pub mod eatsmart;
pub mod handlers;
pub mod lookup;
pub mod services;
pub mod summary;

use crate::state::AppState;
use axum::Router;

pub use lookup::{NutrientFacts, NutrientLookupProvider};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::nutrient_routes())
}
