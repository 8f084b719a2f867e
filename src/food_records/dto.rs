use serde::{Deserialize, Serialize};
use time::Date;

use super::{repo_types::FoodRecord, services::DailySummary};
use crate::nutrition::{
    summary::{IdealPfc, NutrientSummary, PfcRatio},
    NutrientFacts,
};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(with = "iso_date")]
    pub date: Date,
}

#[derive(Debug, Deserialize)]
pub struct OptionalDateQuery {
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
}

/// Without nutrient fields the dish is looked up; with all four they are
/// stored as given.
#[derive(Debug, Deserialize)]
pub struct CreateFoodRecordRequest {
    pub recipe_name: String,
    pub servings: f64,
    #[serde(default, with = "iso_date::option")]
    pub date: Option<Date>,
    pub energy: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbohydrate: Option<f64>,
}

pub enum NutrientInput {
    Lookup,
    Given(NutrientFacts),
    Partial,
}

impl CreateFoodRecordRequest {
    pub fn nutrients(&self) -> NutrientInput {
        match (self.energy, self.protein, self.fat, self.carbohydrate) {
            (None, None, None, None) => NutrientInput::Lookup,
            (Some(energy), Some(protein), Some(fat), Some(carbohydrate)) => {
                NutrientInput::Given(NutrientFacts {
                    energy,
                    protein,
                    fat,
                    carbohydrate,
                })
            }
            _ => NutrientInput::Partial,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FoodRecordResponse {
    pub id: i64,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub recipe_name: String,
    pub servings: f64,
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

impl From<FoodRecord> for FoodRecordResponse {
    fn from(r: FoodRecord) -> Self {
        Self {
            id: r.id,
            date: r.date,
            recipe_name: r.recipe_name,
            servings: r.servings,
            energy: r.energy,
            protein: r.protein,
            fat: r.fat,
            carbohydrate: r.carbohydrate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DailySummaryResponse {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub records: Vec<FoodRecordResponse>,
    pub totals: NutrientSummary,
    pub pfc_ratio: Option<PfcRatio>,
    pub ideal: IdealPfc,
}

impl From<DailySummary> for DailySummaryResponse {
    fn from(s: DailySummary) -> Self {
        Self {
            date: s.date,
            records: s.records.into_iter().map(FoodRecordResponse::from).collect(),
            totals: s.totals,
            pfc_ratio: s.pfc_ratio,
            ideal: s.ideal,
        }
    }
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn create_request_without_nutrients_means_lookup() {
        let req: CreateFoodRecordRequest =
            serde_json::from_str(r#"{"recipe_name":"カレーライス","servings":2}"#).unwrap();
        assert!(req.date.is_none());
        assert!(matches!(req.nutrients(), NutrientInput::Lookup));
    }

    #[test]
    fn create_request_with_some_nutrients_is_partial() {
        let req: CreateFoodRecordRequest = serde_json::from_str(
            r#"{"recipe_name":"x","servings":1,"date":"2024-05-01","energy":100}"#,
        )
        .unwrap();
        assert_eq!(req.date, Some(time::macros::date!(2024 - 05 - 01)));
        assert!(matches!(req.nutrients(), NutrientInput::Partial));
    }

    #[test]
    fn record_response_uses_iso_dates() {
        let res = FoodRecordResponse {
            id: 1,
            date: time::macros::date!(2024 - 05 - 01),
            recipe_name: "おにぎり".into(),
            servings: 1.0,
            energy: 180.0,
            protein: 3.0,
            fat: 0.5,
            carbohydrate: 40.0,
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["recipe_name"], "おにぎり");
    }
}
