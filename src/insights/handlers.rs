use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};
use tracing::{info, instrument};

use crate::{auth::AuthUser, error::ApiError, meals, meals::MealRecord, state::AppState};

use super::engine::{compute_bio_impact, BioImpact};
use super::issues::{compose_insights, Issue};
use super::top_foods::{tally_ingredients, tally_top_foods, IngredientInsight, TopFood};

pub fn routes() -> Router<AppState> {
    Router::new().route("/insights", get(get_insights))
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    /// Minutes east of UTC for the user's wall clock; late-night detection
    /// and the daily grouping depend on it.
    #[serde(default)]
    pub tz_offset_minutes: i32,
}
fn default_days() -> i64 {
    7
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub window_days: i64,
    pub meal_count: usize,
    pub bio_impact: BioImpact,
    pub optimized: bool,
    pub issues: Vec<Issue>,
    pub top_foods: Vec<TopFood>,
    pub ingredient_insights: Vec<IngredientInsight>,
}

#[instrument(skip(state))]
pub async fn get_insights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<InsightsQuery>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let days = q.days.clamp(1, 365);
    let offset = UtcOffset::from_whole_seconds(q.tz_offset_minutes * 60)
        .map_err(|_| ApiError::BadRequest("Invalid tz_offset_minutes".into()))?;
    let since = OffsetDateTime::now_utc() - Duration::days(days);

    let rows = meals::repo::list_since(&state.db, user_id, since).await?;

    // oldest first so driver and tally insertion order follows the timeline;
    // restore the user's wall clock before the hour-of-day checks
    let records: Vec<MealRecord> = rows
        .into_iter()
        .rev()
        .map(|row| {
            let mut record = row.into_details().record;
            record.timestamp = record.timestamp.to_offset(offset);
            record
        })
        .collect();

    let bio_impact = compute_bio_impact(&records);
    let report = compose_insights(&bio_impact);
    let top_foods = tally_top_foods(&records);
    let ingredient_insights = tally_ingredients(&records);

    info!(
        user_id = %user_id,
        meals = records.len(),
        drivers = bio_impact.negative_drivers.len(),
        optimized = report.optimized,
        "insights computed"
    );

    Ok(Json(InsightsResponse {
        window_days: days,
        meal_count: records.len(),
        bio_impact,
        optimized: report.optimized,
        issues: report.issues,
        top_foods,
        ingredient_insights,
    }))
}
