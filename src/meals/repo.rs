use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{FoodItem, MealDetails, MealRecord, MealType};

#[derive(Debug, Clone, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: String,
    pub logged_at: OffsetDateTime,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub foods: serde_json::Value,
    pub logging_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl MealRow {
    /// Convert a stored row into the engine-facing record. Unparseable food
    /// payloads degrade to an empty list rather than failing the request.
    pub fn into_details(self) -> MealDetails {
        let foods: Vec<FoodItem> = serde_json::from_value(self.foods).unwrap_or_default();
        MealDetails {
            id: self.id,
            record: MealRecord {
                timestamp: self.logged_at,
                // rows predating the CHECK constraint fall back to snack
                meal_type: MealType::parse(&self.meal_type).unwrap_or(MealType::Snack),
                total_calories: self.total_calories,
                total_protein: self.total_protein,
                total_carbs: self.total_carbs,
                total_fat: self.total_fat,
                foods,
            },
            logging_method: self.logging_method,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    meal_type: MealType,
    logged_at: OffsetDateTime,
    totals: (f64, f64, f64, f64),
    foods: &[FoodItem],
    logging_method: Option<&str>,
    notes: Option<&str>,
) -> anyhow::Result<MealRow> {
    let (calories, protein, carbs, fat) = totals;
    let row = sqlx::query_as::<_, MealRow>(
        r#"
        INSERT INTO meals (user_id, meal_type, logged_at, total_calories,
                           total_protein, total_carbs, total_fat, foods,
                           logging_method, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, user_id, meal_type, logged_at, total_calories,
                  total_protein, total_carbs, total_fat, foods,
                  logging_method, notes, created_at
        "#,
    )
    .bind(user_id)
    .bind(meal_type.as_str())
    .bind(logged_at)
    .bind(calories)
    .bind(protein)
    .bind(carbs)
    .bind(fat)
    .bind(serde_json::to_value(foods)?)
    .bind(logging_method)
    .bind(notes)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Meals logged at or after `since`, newest first.
pub async fn list_since(
    db: &PgPool,
    user_id: Uuid,
    since: OffsetDateTime,
) -> anyhow::Result<Vec<MealRow>> {
    let rows = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT id, user_id, meal_type, logged_at, total_calories,
               total_protein, total_carbs, total_fat, foods,
               logging_method, notes, created_at
        FROM meals
        WHERE user_id = $1 AND logged_at >= $2
        ORDER BY logged_at DESC
        LIMIT 1000
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Meals logged inside `[start, end)`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<Vec<MealRow>> {
    let rows = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT id, user_id, meal_type, logged_at, total_calories,
               total_protein, total_carbs, total_fat, foods,
               logging_method, notes, created_at
        FROM meals
        WHERE user_id = $1 AND logged_at >= $2 AND logged_at < $3
        ORDER BY logged_at ASC
        LIMIT 1000
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<MealRow>> {
    let row = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT id, user_id, meal_type, logged_at, total_calories,
               total_protein, total_carbs, total_fat, foods,
               logging_method, notes, created_at
        FROM meals
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
