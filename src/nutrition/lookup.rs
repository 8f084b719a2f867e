use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Labels used by the lookup site's nutrient table.
pub const ENERGY_LABEL: &str = "エネルギー";
pub const PROTEIN_LABEL: &str = "たんぱく質";
pub const FAT_LABEL: &str = "脂質";
pub const CARBOHYDRATE_LABEL: &str = "炭水化物";

/// Energy in kcal, the rest in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutrientFacts {
    pub energy: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

impl NutrientFacts {
    pub fn scaled(&self, servings: f64) -> Self {
        Self {
            energy: self.energy * servings,
            protein: self.protein * servings,
            fat: self.fat * servings,
            carbohydrate: self.carbohydrate * servings,
        }
    }

    /// Pull the four nutrients out of a label → raw text table, e.g.
    /// `{"エネルギー": "500kcal", "たんぱく質": "20.5g", ...}`.
    pub fn from_table(table: &BTreeMap<String, String>) -> Result<Self, LookupError> {
        Ok(Self {
            energy: table_amount(table, ENERGY_LABEL)?,
            protein: table_amount(table, PROTEIN_LABEL)?,
            fat: table_amount(table, FAT_LABEL)?,
            carbohydrate: table_amount(table, CARBOHYDRATE_LABEL)?,
        })
    }
}

/// Result of a lookup as shown to the user: one serving and the amount eaten.
/// `total` is for display; persisted records scale `per_serving` themselves.
#[derive(Debug, Clone, Serialize)]
pub struct NutrientLookup {
    pub dish: String,
    pub servings: f64,
    pub per_serving: NutrientFacts,
    pub total: NutrientFacts,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request to lookup site failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup site answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("invalid lookup url: {0}")]
    BadUrl(String),

    #[error("search form not found on {0}")]
    SearchFormMissing(String),

    #[error("no search result matching '{dish}'")]
    ResultNotFound { dish: String },

    #[error("no search result within {0:?}")]
    Timeout(Duration),

    #[error("nutrient '{0}' missing from result page")]
    MissingNutrient(&'static str),

    #[error("nutrient '{nutrient}' has non-numeric value '{raw}'")]
    InvalidValue { nutrient: &'static str, raw: String },
}

impl LookupError {
    /// The site answered, but the page did not hold readable nutrient data.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            LookupError::MissingNutrient(_) | LookupError::InvalidValue { .. }
        )
    }
}

/// Source of per-serving nutrient values for a free-text dish name.
#[async_trait]
pub trait NutrientLookupProvider: Send + Sync {
    async fn per_serving(&self, dish: &str) -> Result<NutrientFacts, LookupError>;
}

pub async fn lookup(
    provider: &dyn NutrientLookupProvider,
    dish: &str,
    servings: f64,
) -> Result<NutrientLookup, LookupError> {
    let per_serving = provider.per_serving(dish).await?;
    Ok(NutrientLookup {
        dish: dish.to_string(),
        servings,
        per_serving,
        total: per_serving.scaled(servings),
    })
}

fn table_amount(
    table: &BTreeMap<String, String>,
    label: &'static str,
) -> Result<f64, LookupError> {
    let raw = table
        .get(label)
        .ok_or(LookupError::MissingNutrient(label))?;
    parse_amount(raw).ok_or_else(|| LookupError::InvalidValue {
        nutrient: label,
        raw: raw.clone(),
    })
}

/// First decimal number in `raw`, ignoring unit suffixes and thousands
/// separators: "1,234kcal" → 1234.0, "12.5g" → 12.5, "-" → None.
pub fn parse_amount(raw: &str) -> Option<f64> {
    lazy_static! {
        static ref AMOUNT_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
    }
    let cleaned = raw.replace(',', "");
    AMOUNT_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Fixed tables keyed by dish name, for tests and offline runs.
#[cfg(test)]
#[derive(Default)]
pub struct StaticLookup {
    tables: std::collections::HashMap<String, BTreeMap<String, String>>,
}

#[cfg(test)]
impl StaticLookup {
    pub fn with_table(mut self, dish: &str, rows: &[(&str, &str)]) -> Self {
        let table = rows
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.tables.insert(dish.to_string(), table);
        self
    }
}

#[cfg(test)]
#[async_trait]
impl NutrientLookupProvider for StaticLookup {
    async fn per_serving(&self, dish: &str) -> Result<NutrientFacts, LookupError> {
        let table = self
            .tables
            .get(dish)
            .ok_or_else(|| LookupError::ResultNotFound { dish: dish.to_string() })?;
        NutrientFacts::from_table(table)
    }
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    fn curry_rows() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENERGY_LABEL, "500kcal"),
            (PROTEIN_LABEL, "20g"),
            (FAT_LABEL, "10g"),
            (CARBOHYDRATE_LABEL, "60g"),
        ]
    }

    #[test]
    fn parse_amount_strips_units() {
        assert_eq!(parse_amount("500kcal"), Some(500.0));
        assert_eq!(parse_amount(" 12.5g "), Some(12.5));
        assert_eq!(parse_amount("1,234kcal"), Some(1234.0));
        assert_eq!(parse_amount("0.3 g"), Some(0.3));
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn from_table_reads_all_four_nutrients() {
        let table: BTreeMap<String, String> = curry_rows()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let facts = NutrientFacts::from_table(&table).unwrap();
        assert_eq!(
            facts,
            NutrientFacts {
                energy: 500.0,
                protein: 20.0,
                fat: 10.0,
                carbohydrate: 60.0
            }
        );
    }

    #[test]
    fn from_table_names_the_missing_nutrient() {
        let mut table = BTreeMap::new();
        table.insert(ENERGY_LABEL.to_string(), "500kcal".to_string());
        let err = NutrientFacts::from_table(&table).unwrap_err();
        assert!(matches!(err, LookupError::MissingNutrient(PROTEIN_LABEL)));
        assert!(err.is_parse_error());
    }

    #[test]
    fn from_table_rejects_non_numeric_values() {
        let mut table: BTreeMap<String, String> = curry_rows()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        table.insert(FAT_LABEL.to_string(), "Tr".to_string());
        let err = NutrientFacts::from_table(&table).unwrap_err();
        match err {
            LookupError::InvalidValue { nutrient, raw } => {
                assert_eq!(nutrient, FAT_LABEL);
                assert_eq!(raw, "Tr");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn lookup_scales_the_display_total_only() {
        let provider = StaticLookup::default().with_table("カレーライス", &curry_rows());
        let result = lookup(&provider, "カレーライス", 2.0).await.unwrap();
        assert_eq!(result.per_serving.energy, 500.0);
        assert_eq!(result.total.energy, 1000.0);
        assert_eq!(result.total.protein, 40.0);
        assert_eq!(result.total.fat, 20.0);
        assert_eq!(result.total.carbohydrate, 120.0);
    }

    #[tokio::test]
    async fn unknown_dish_is_not_a_parse_error() {
        let provider = StaticLookup::default();
        let err = lookup(&provider, "ラーメン", 1.0).await.unwrap_err();
        assert!(matches!(err, LookupError::ResultNotFound { .. }));
        assert!(!err.is_parse_error());
    }
}
