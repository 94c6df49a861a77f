use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{auth::AuthUser, error::ApiError, state::AppState};

use super::dto::{
    DailyStats, HistoryQuery, HistoryResponse, LogMealRequest, MealDetails, StatsQuery,
};
use super::repo::{self, MealRow};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/history", get(history))
        .route("/meals/stats", get(daily_stats))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(log_meal))
        .route("/meals/:id", axum::routing::delete(delete_meal))
}

#[instrument(skip(state, payload))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<LogMealRequest>,
) -> Result<(StatusCode, Json<MealDetails>), ApiError> {
    let logged_at = payload.timestamp.unwrap_or_else(OffsetDateTime::now_utc);
    let calories = payload
        .total_calories
        .unwrap_or_else(|| payload.foods.iter().map(|f| f.calories).sum());

    let row = repo::insert(
        &state.db,
        user_id,
        payload.meal_type,
        logged_at,
        (
            calories,
            payload.total_protein,
            payload.total_carbs,
            payload.total_fat,
        ),
        &payload.foods,
        payload.logging_method.as_deref(),
        payload.notes.as_deref(),
    )
    .await?;

    info!(user_id = %user_id, meal_id = %row.id, meal_type = %row.meal_type, "meal logged");
    Ok((StatusCode::CREATED, Json(row.into_details())))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let days = q.days.clamp(1, 365);
    let since = OffsetDateTime::now_utc() - Duration::days(days);

    let rows = repo::list_since(&state.db, user_id, since).await?;
    let meals: Vec<MealDetails> = rows.into_iter().map(MealRow::into_details).collect();
    let count = meals.len();
    Ok(Json(HistoryResponse { meals, count }))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealDetails>, ApiError> {
    let row = repo::get(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meal not found".into()))?;
    Ok(Json(row.into_details()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = repo::delete(&state.db, user_id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Meal not found".into()));
    }
    info!(user_id = %user_id, meal_id = %id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn daily_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<StatsQuery>,
) -> Result<Json<DailyStats>, ApiError> {
    let offset = UtcOffset::from_whole_seconds(q.tz_offset_minutes * 60)
        .map_err(|_| ApiError::BadRequest("Invalid tz_offset_minutes".into()))?;

    let date_format = format_description!("[year]-[month]-[day]");
    let date = match &q.date {
        Some(s) => Date::parse(s, &date_format)
            .map_err(|_| ApiError::BadRequest("Invalid date, expected YYYY-MM-DD".into()))?,
        None => OffsetDateTime::now_utc().to_offset(offset).date(),
    };

    let start = date.midnight().assume_offset(offset);
    let end = start + Duration::days(1);

    let rows = repo::list_between(&state.db, user_id, start, end).await?;

    let mut stats = DailyStats {
        date: date
            .format(&date_format)
            .map_err(|e| ApiError::Internal(e.into()))?,
        meals_logged: rows.len(),
        total_calories: 0.0,
        total_protein: 0.0,
        total_carbs: 0.0,
        total_fat: 0.0,
    };
    for row in &rows {
        stats.total_calories += row.total_calories;
        stats.total_protein += row.total_protein;
        stats.total_carbs += row.total_carbs;
        stats.total_fat += row.total_fat;
    }

    Ok(Json(stats))
}
