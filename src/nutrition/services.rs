use tracing::{info, warn};

use super::lookup::{self, NutrientLookup, NutrientLookupProvider};
use crate::error::{ServiceError, ServiceResult};

pub(crate) fn validate_servings(servings: f64) -> ServiceResult<f64> {
    if !servings.is_finite() || servings <= 0.0 {
        warn!(servings, "rejected servings");
        return Err(ServiceError::Validation(
            "servings must be a positive number".into(),
        ));
    }
    Ok(servings)
}

pub(crate) fn validate_dish(dish: &str) -> ServiceResult<String> {
    let dish = dish.trim();
    if dish.is_empty() {
        return Err(ServiceError::Validation("recipe name is required".into()));
    }
    Ok(dish.to_string())
}

/// Look a dish up for display. Nothing is persisted.
pub async fn preview(
    provider: &dyn NutrientLookupProvider,
    dish: &str,
    servings: f64,
) -> ServiceResult<NutrientLookup> {
    let dish = validate_dish(dish)?;
    let servings = validate_servings(servings)?;
    let result = lookup::lookup(provider, &dish, servings).await.map_err(|e| {
        warn!(error = %e, %dish, "nutrient lookup failed");
        ServiceError::from(e)
    })?;
    info!(%dish, servings, energy = result.total.energy, "nutrient lookup done");
    Ok(result)
}

#[cfg(test)]
mod service_tests {
    use super::*;
    use crate::nutrition::lookup::StaticLookup;

    #[test]
    fn servings_must_be_positive_and_finite() {
        assert!(validate_servings(0.5).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(validate_servings(bad), Err(ServiceError::Validation(_))));
        }
    }

    #[test]
    fn dish_is_trimmed() {
        assert_eq!(validate_dish("  カレーライス ").unwrap(), "カレーライス");
        assert!(validate_dish("   ").is_err());
    }

    #[tokio::test]
    async fn preview_maps_missing_result_to_lookup_failed() {
        let provider = StaticLookup::default();
        let err = preview(&provider, "ラーメン", 1.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::LookupFailed(_)));
    }

    #[tokio::test]
    async fn preview_maps_bad_table_to_lookup_parse() {
        let provider = StaticLookup::default().with_table("水", &[("エネルギー", "0kcal")]);
        let err = preview(&provider, "水", 1.0).await.unwrap_err();
        assert!(matches!(err, ServiceError::LookupParse(_)));
    }
}
