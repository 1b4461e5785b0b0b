use serde::Serialize;
use std::collections::HashMap;

/// A recipe as loaded from the dataset.
///
/// Ingredient keys are normalized (trimmed, lowercased) at load time, so all
/// set operations during ranking work directly on the stored map.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: String,
    pub url: String,
    /// Normalized ingredient name to the amount as written in the dataset.
    pub ingredients: HashMap<String, String>,
}

/// Placeholder for nutrition data that could not be determined at all.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholders for a single missing field inside an otherwise present
/// nutrition block. Kept byte-identical to what existing consumers expect.
const MISSING_VALUE: &str = "нема";
const MISSING_FAT: &str = "тютю";

/// Outcome of a nutrition lookup for one recipe page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NutritionInfo {
    /// The page could not be fetched or carries no nutrition block.
    Unavailable,
    /// A nutrition block was found. Individual fields may still be missing.
    Found(NutritionFacts),
}

/// Raw values extracted from a page's nutrition block, each field on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionFacts {
    pub calories: Option<String>,
    pub proteins: Option<String>,
    pub fats: Option<String>,
    pub carbs: Option<String>,
    pub calories_per_100g: Option<String>,
}

/// Wire form of a nutrition lookup, with every field defaulted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NutritionRecord {
    pub calories: String,
    pub proteins: String,
    pub fats: String,
    pub carbs: String,
    #[serde(rename = "calories100g")]
    pub calories_100g: String,
}

impl NutritionInfo {
    /// Apply the default policy: an unavailable lookup yields `N/A` across
    /// the board, while a present block defaults each absent field on its
    /// own (`нема`, or `тютю` for fats; `N/A` for the per-100g figure).
    pub fn into_record(self) -> NutritionRecord {
        match self {
            NutritionInfo::Unavailable => NutritionRecord::unavailable(),
            NutritionInfo::Found(facts) => NutritionRecord {
                calories: facts.calories.unwrap_or_else(|| MISSING_VALUE.to_string()),
                proteins: facts.proteins.unwrap_or_else(|| MISSING_VALUE.to_string()),
                fats: facts.fats.unwrap_or_else(|| MISSING_FAT.to_string()),
                carbs: facts.carbs.unwrap_or_else(|| MISSING_VALUE.to_string()),
                calories_100g: facts
                    .calories_per_100g
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            },
        }
    }
}

impl NutritionRecord {
    pub fn unavailable() -> Self {
        Self {
            calories: NOT_AVAILABLE.to_string(),
            proteins: NOT_AVAILABLE.to_string(),
            fats: NOT_AVAILABLE.to_string(),
            carbs: NOT_AVAILABLE.to_string(),
            calories_100g: NOT_AVAILABLE.to_string(),
        }
    }
}
