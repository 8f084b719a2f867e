use sqlx::SqlitePool;
use time::Date;
use tracing::{info, warn};

use super::{
    repo,
    repo_types::{FoodRecord, NewFoodRecord},
};
use crate::{
    error::{ServiceError, ServiceResult},
    nutrition::{
        services::{validate_dish, validate_servings},
        summary::{ideal_pfc, pfc_ratio, summarize, IdealPfc, NutrientSummary, PfcRatio},
        NutrientFacts, NutrientLookupProvider,
    },
    users::services::get_user,
};

/// Everything shown for one user on one day.
#[derive(Debug, Clone)]
pub struct DailySummary {
    pub date: Date,
    pub records: Vec<FoodRecord>,
    pub totals: NutrientSummary,
    pub pfc_ratio: Option<PfcRatio>,
    pub ideal: IdealPfc,
}

fn validate_nutrients(n: &NutrientFacts) -> ServiceResult<()> {
    let all = [n.energy, n.protein, n.fat, n.carbohydrate];
    if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(ServiceError::Validation(
            "nutrient values must be non-negative numbers".into(),
        ));
    }
    Ok(())
}

/// Store a record whose nutrient totals are already known.
pub async fn create_food_record(
    db: &SqlitePool,
    username: &str,
    date: Date,
    recipe_name: &str,
    servings: f64,
    totals: NutrientFacts,
) -> ServiceResult<FoodRecord> {
    let recipe_name = validate_dish(recipe_name)?;
    let servings = validate_servings(servings)?;
    validate_nutrients(&totals)?;
    let user = get_user(db, username).await?;

    let record = repo::insert(
        db,
        &NewFoodRecord {
            user_id: user.id,
            date,
            recipe_name,
            servings,
            nutrients: totals,
        },
    )
    .await?;

    info!(
        record_id = record.id,
        user_id = user.id,
        recipe = %record.recipe_name,
        energy = record.energy,
        "food record saved"
    );
    Ok(record)
}

/// Look the dish up, scale one serving by `servings` and store the result.
/// A failed lookup stores nothing.
pub async fn record_meal(
    db: &SqlitePool,
    provider: &dyn NutrientLookupProvider,
    username: &str,
    date: Date,
    recipe_name: &str,
    servings: f64,
) -> ServiceResult<FoodRecord> {
    let recipe_name = validate_dish(recipe_name)?;
    let servings = validate_servings(servings)?;
    // resolve the user before paying for a lookup
    get_user(db, username).await?;

    let per_serving = provider.per_serving(&recipe_name).await.map_err(|e| {
        warn!(error = %e, recipe = %recipe_name, %username, "lookup failed, record not saved");
        ServiceError::from(e)
    })?;

    create_food_record(
        db,
        username,
        date,
        &recipe_name,
        servings,
        per_serving.scaled(servings),
    )
    .await
}

pub async fn list_food_records(
    db: &SqlitePool,
    username: &str,
    date: Date,
) -> ServiceResult<Vec<FoodRecord>> {
    let user = get_user(db, username).await?;
    Ok(repo::list_by_user_and_date(db, user.id, date).await?)
}

pub async fn daily_summary(
    db: &SqlitePool,
    username: &str,
    date: Date,
) -> ServiceResult<DailySummary> {
    let records = list_food_records(db, username, date).await?;
    let totals = summarize(&records);
    Ok(DailySummary {
        date,
        pfc_ratio: pfc_ratio(totals.total_protein, totals.total_fat, totals.total_carbohydrate),
        totals,
        records,
        ideal: ideal_pfc(),
    })
}

#[cfg(test)]
mod food_record_service_tests {
    use time::macros::date;

    use super::*;
    use crate::{db::test_pool, nutrition::lookup::StaticLookup, users::services::create_user};

    const DAY: Date = date!(2024 - 05 - 01);

    fn curry() -> StaticLookup {
        StaticLookup::default().with_table(
            "カレーライス",
            &[
                ("エネルギー", "500kcal"),
                ("たんぱく質", "20g"),
                ("脂質", "10g"),
                ("炭水化物", "60g"),
            ],
        )
    }

    #[tokio::test]
    async fn record_meal_scales_once_by_servings() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();

        let rec = record_meal(&db, &curry(), "alice", DAY, "カレーライス", 2.0)
            .await
            .unwrap();
        assert_eq!(rec.servings, 2.0);
        assert_eq!(rec.energy, 1000.0);
        assert_eq!(rec.protein, 40.0);
        assert_eq!(rec.fat, 20.0);
        assert_eq!(rec.carbohydrate, 120.0);

        let stored = list_food_records(&db, "alice", DAY).await.unwrap();
        assert_eq!(stored, vec![rec]);
    }

    #[tokio::test]
    async fn failed_lookup_writes_nothing() {
        let db = test_pool().await;
        let alice = create_user(&db, "alice").await.unwrap();

        let err = record_meal(&db, &curry(), "alice", DAY, "ラーメン", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::LookupFailed(_)));
        assert_eq!(repo::count_by_user(&db, alice.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found_before_lookup() {
        let db = test_pool().await;
        let err = record_meal(&db, &curry(), "ghost", DAY, "カレーライス", 1.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn explicit_totals_are_stored_verbatim() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();
        let totals = NutrientFacts {
            energy: 321.5,
            protein: 12.0,
            fat: 8.25,
            carbohydrate: 44.0,
        };

        let rec = create_food_record(&db, "alice", DAY, "おにぎり", 1.5, totals)
            .await
            .unwrap();
        assert_eq!(rec.energy, 321.5);
        assert_eq!(rec.fat, 8.25);
        assert_eq!(rec.date, DAY);
    }

    #[tokio::test]
    async fn negative_nutrients_are_rejected() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();
        let totals = NutrientFacts {
            energy: -1.0,
            ..Default::default()
        };
        let err = create_food_record(&db, "alice", DAY, "x", 1.0, totals)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn records_are_scoped_to_user_and_date() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();
        create_user(&db, "bob").await.unwrap();
        let provider = curry();

        record_meal(&db, &provider, "alice", DAY, "カレーライス", 1.0).await.unwrap();
        record_meal(&db, &provider, "alice", date!(2024 - 05 - 02), "カレーライス", 1.0)
            .await
            .unwrap();
        record_meal(&db, &provider, "bob", DAY, "カレーライス", 1.0).await.unwrap();

        assert_eq!(list_food_records(&db, "alice", DAY).await.unwrap().len(), 1);
        assert_eq!(list_food_records(&db, "bob", DAY).await.unwrap().len(), 1);
        assert!(list_food_records(&db, "bob", date!(2024 - 05 - 02))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn daily_summary_totals_the_day() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();
        let provider = curry();
        record_meal(&db, &provider, "alice", DAY, "カレーライス", 1.0).await.unwrap();
        record_meal(&db, &provider, "alice", DAY, "カレーライス", 0.5).await.unwrap();

        let s = daily_summary(&db, "alice", DAY).await.unwrap();
        assert_eq!(s.records.len(), 2);
        assert_eq!(s.totals.total_energy, 750.0);
        assert_eq!(s.totals.total_carbohydrate, 90.0);
        let r = s.pfc_ratio.expect("ratio");
        assert!((r.protein + r.fat + r.carbohydrate - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_day_has_zero_totals_and_no_ratio() {
        let db = test_pool().await;
        create_user(&db, "alice").await.unwrap();

        let s = daily_summary(&db, "alice", DAY).await.unwrap();
        assert!(s.records.is_empty());
        assert_eq!(s.totals, NutrientSummary::default());
        assert!(s.pfc_ratio.is_none());
    }

    #[tokio::test]
    async fn deleting_a_user_removes_its_records() {
        let db = test_pool().await;
        let alice = create_user(&db, "alice").await.unwrap();
        record_meal(&db, &curry(), "alice", DAY, "カレーライス", 1.0).await.unwrap();

        crate::users::services::delete_user(&db, "alice").await.unwrap();
        assert_eq!(repo::count_by_user(&db, alice.id).await.unwrap(), 0);
    }
}
