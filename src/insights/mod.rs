//! Bio-impact analysis: a pure pipeline that scans a window of logged meals
//! and derives wellness scores, organ-effect scores, negative-driver
//! attribution with culprit foods, corrective insights, and top-food tallies.

pub mod engine;
pub mod handlers;
pub mod issues;
pub mod rules;
pub mod top_foods;

use crate::state::AppState;
use axum::Router;

pub use engine::{compute_bio_impact, BioImpact, CulpritFood};
pub use issues::{compose_insights, InsightReport, Issue};
pub use top_foods::{tally_ingredients, tally_top_foods, IngredientInsight, TopFood};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
