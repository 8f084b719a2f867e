use serde::Serialize;

use crate::food_records::repo_types::FoodRecord;

pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const FAT_KCAL_PER_G: f64 = 9.0;
pub const CARBOHYDRATE_KCAL_PER_G: f64 = 4.0;

/// Daily energy used for the ideal split.
pub const IDEAL_TOTAL_KCAL: f64 = 2000.0;
pub const IDEAL_PROTEIN_PERCENT: f64 = 15.0;
pub const IDEAL_FAT_PERCENT: f64 = 25.0;
pub const IDEAL_CARBOHYDRATE_PERCENT: f64 = 60.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutrientSummary {
    pub total_energy: f64,
    pub total_protein: f64,
    pub total_fat: f64,
    pub total_carbohydrate: f64,
}

/// Shares of total calories, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PfcRatio {
    pub protein: f64,
    pub fat: f64,
    pub carbohydrate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealPfc {
    pub total_calories: f64,
    pub protein_kcal: f64,
    pub fat_kcal: f64,
    pub carbohydrate_kcal: f64,
    pub ratio: PfcRatio,
}

pub fn summarize(records: &[FoodRecord]) -> NutrientSummary {
    records
        .iter()
        .fold(NutrientSummary::default(), |acc, r| NutrientSummary {
            total_energy: acc.total_energy + r.energy,
            total_protein: acc.total_protein + r.protein,
            total_fat: acc.total_fat + r.fat,
            total_carbohydrate: acc.total_carbohydrate + r.carbohydrate,
        })
}

/// Calorie-weighted shares of protein, fat and carbohydrate given in grams.
/// `None` when there is nothing to divide by.
pub fn pfc_ratio(protein: f64, fat: f64, carbohydrate: f64) -> Option<PfcRatio> {
    let protein_kcal = protein * PROTEIN_KCAL_PER_G;
    let fat_kcal = fat * FAT_KCAL_PER_G;
    let carbohydrate_kcal = carbohydrate * CARBOHYDRATE_KCAL_PER_G;
    let total = protein_kcal + fat_kcal + carbohydrate_kcal;
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(PfcRatio {
        protein: protein_kcal / total,
        fat: fat_kcal / total,
        carbohydrate: carbohydrate_kcal / total,
    })
}

pub fn ideal_pfc() -> IdealPfc {
    let kcal = |percent: f64| IDEAL_TOTAL_KCAL * percent / 100.0;
    IdealPfc {
        total_calories: IDEAL_TOTAL_KCAL,
        protein_kcal: kcal(IDEAL_PROTEIN_PERCENT),
        fat_kcal: kcal(IDEAL_FAT_PERCENT),
        carbohydrate_kcal: kcal(IDEAL_CARBOHYDRATE_PERCENT),
        ratio: PfcRatio {
            protein: IDEAL_PROTEIN_PERCENT / 100.0,
            fat: IDEAL_FAT_PERCENT / 100.0,
            carbohydrate: IDEAL_CARBOHYDRATE_PERCENT / 100.0,
        },
    }
}

// ---- daily intake guide ----

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProteinGuide {
    /// grams per kg of body weight
    pub with_exercise_g_per_kg: f64,
    pub without_exercise_g_per_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntakeRange {
    pub group: &'static str,
    pub reference_kcal: u32,
    pub min_g: f64,
    pub max_g: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntakeGuide {
    pub protein: ProteinGuide,
    pub fat: Vec<IntakeRange>,
    pub carbohydrate: Vec<IntakeRange>,
}

pub fn intake_guide() -> IntakeGuide {
    IntakeGuide {
        protein: ProteinGuide {
            with_exercise_g_per_kg: 2.0,
            without_exercise_g_per_kg: 1.0,
        },
        fat: vec![
            IntakeRange {
                group: "male",
                reference_kcal: 2650,
                min_g: 60.0,
                max_g: 90.0,
            },
            IntakeRange {
                group: "female",
                reference_kcal: 2000,
                min_g: 45.0,
                max_g: 70.0,
            },
        ],
        carbohydrate: vec![
            IntakeRange {
                group: "male",
                reference_kcal: 2650,
                min_g: 330.0,
                max_g: 430.0,
            },
            IntakeRange {
                group: "female",
                reference_kcal: 2000,
                min_g: 250.0,
                max_g: 325.0,
            },
        ],
    }
}
