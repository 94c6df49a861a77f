use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Kind of eating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// An ingredient reference inside a food item. Clients send either a bare
/// string or a `{ "name": ... }` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IngredientRef {
    Name(String),
    Record { name: String },
}

impl IngredientRef {
    pub fn name(&self) -> &str {
        match self {
            IngredientRef::Name(n) => n,
            IngredientRef::Record { name } => name,
        }
    }
}

/// One food within a meal. Absent nutrient fields mean zero contribution,
/// never "unknown" — enforced here at the serde boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub trans_fat: f64,
    #[serde(default)]
    pub saturated_fat: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<IngredientRef>,
}

/// One logged eating event as the analysis engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub meal_type: MealType,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub foods: Vec<FoodItem>,
}

/// Request body for logging a meal.
#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    pub meal_type: MealType,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    #[serde(default)]
    pub foods: Vec<FoodItem>,
    pub total_calories: Option<f64>,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    pub logging_method: Option<String>,
    pub notes: Option<String>,
}

/// A stored meal returned to the client.
#[derive(Debug, Serialize)]
pub struct MealDetails {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: MealRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}
fn default_days() -> i64 {
    7
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub meals: Vec<MealDetails>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub date: Option<String>,
    #[serde(default)]
    pub tz_offset_minutes: i32,
}

/// Nutrition totals for a single day.
#[derive(Debug, Serialize)]
pub struct DailyStats {
    pub date: String,
    pub meals_logged: usize,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_item_missing_fields_default_to_zero() {
        let food: FoodItem = serde_json::from_str(r#"{"name":"Oatmeal"}"#).unwrap();
        assert_eq!(food.sugar, 0.0);
        assert_eq!(food.sodium, 0.0);
        assert_eq!(food.trans_fat, 0.0);
        assert_eq!(food.saturated_fat, 0.0);
        assert!(food.ingredients.is_empty());
    }

    #[test]
    fn ingredients_accept_strings_and_records() {
        let food: FoodItem = serde_json::from_str(
            r#"{"name":"Granola","ingredients":["oats",{"name":"honey"}]}"#,
        )
        .unwrap();
        let names: Vec<&str> = food.ingredients.iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["oats", "honey"]);
    }

    #[test]
    fn meal_record_parses_wire_shape() {
        let meal: MealRecord = serde_json::from_str(
            r#"{
                "timestamp": "2025-06-01T12:30:00Z",
                "meal_type": "lunch",
                "total_calories": 640,
                "total_protein": 32,
                "total_carbs": 70,
                "total_fat": 22,
                "foods": [{"name": "Chicken Wrap", "sodium": 900}]
            }"#,
        )
        .unwrap();
        assert_eq!(meal.meal_type, MealType::Lunch);
        assert_eq!(meal.foods.len(), 1);
        assert_eq!(meal.foods[0].sodium, 900.0);
    }

    #[test]
    fn meal_record_tolerates_missing_foods_and_totals() {
        let meal: MealRecord = serde_json::from_str(
            r#"{"timestamp": "2025-06-01T08:00:00Z", "meal_type": "breakfast"}"#,
        )
        .unwrap();
        assert!(meal.foods.is_empty());
        assert_eq!(meal.total_protein, 0.0);
    }
}
