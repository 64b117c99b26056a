// backend/src/routes/summary.rs

use axum::{extract::{Query, State}, Json};
use serde::Deserialize;

use crate::{AppState, error::AppError, models::{DateRange, Summary}, summary::summarize};

#[derive(Deserialize)]
pub struct SummaryQ {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tail_number: Option<String>,
}

// GET /api/summary
pub async fn get_summary(
    State(state): State<AppState>,
    Query(q): Query<SummaryQ>,
) -> Result<Json<Summary>, AppError> {
    // Validate before touching either store.
    let range = DateRange::parse(q.start_date.as_deref(), q.end_date.as_deref())?;
    let tail = q.tail_number.unwrap_or_else(|| state.config.default_tail_number.clone());

    let summary = summarize(state.flights.as_ref(), state.settings.as_ref(), &tail, &range).await?;
    Ok(Json(summary))
}
