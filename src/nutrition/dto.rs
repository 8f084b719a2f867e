use serde::{Deserialize, Serialize};

use super::summary::{IdealPfc, IntakeGuide};

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub dish: String,
    #[serde(default = "default_servings")]
    pub servings: f64,
}

fn default_servings() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
pub struct IdealResponse {
    pub ideal: IdealPfc,
    pub guide: IntakeGuide,
}
