use crate::config::AppConfig;
use crate::db;
use crate::nutrition::{eatsmart::EatSmartLookup, NutrientLookupProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub lookup: Arc<dyn NutrientLookupProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config).await?;
        db::ensure_schema(&db).await?;

        let lookup = Arc::new(EatSmartLookup::new(&config.lookup)?) as Arc<dyn NutrientLookupProvider>;

        Ok(Self { db, config, lookup })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        lookup: Arc<dyn NutrientLookupProvider>,
    ) -> Self {
        Self { db, config, lookup }
    }

    /// In-memory store and a lookup that knows カレーライス
    /// (500kcal / 20g / 10g / 60g per serving) and a 水 page with energy only.
    #[cfg(test)]
    pub async fn fake() -> Self {
        use crate::config::LookupConfig;
        use crate::nutrition::lookup::StaticLookup;

        let lookup = StaticLookup::default().with_table(
            "カレーライス",
            &[
                ("エネルギー", "500kcal"),
                ("たんぱく質", "20g"),
                ("脂質", "10g"),
                ("炭水化物", "60g"),
            ],
        )
        .with_table("水", &[("エネルギー", "0kcal")]);

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            lookup: LookupConfig {
                base_url: "http://lookup.invalid".into(),
                timeout_ms: 100,
                user_agent: "test".into(),
            },
        });

        Self::from_parts(db::test_pool().await, config, Arc::new(lookup))
    }
}
