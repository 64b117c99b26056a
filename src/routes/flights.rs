// backend/src/routes/flights.rs

use axum::{extract::{Query, State}, Json};
use serde::Deserialize;

use crate::{AppState, error::AppError, models::{DateRange, FlightRecord}};

#[derive(Deserialize)]
pub struct ListQ {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub tail_number: Option<String>,
    pub limit: Option<i64>,
}

// GET /api/flights
pub async fn list_flights(
    State(state): State<AppState>,
    Query(q): Query<ListQ>,
) -> Result<Json<Vec<FlightRecord>>, AppError> {
    let range = DateRange::parse(q.start_date.as_deref(), q.end_date.as_deref())?;
    let tail = q.tail_number.unwrap_or_else(|| state.config.default_tail_number.clone());

    let limit = q.limit.map(|l| l.clamp(1, 500));
    let rows = state.flights.list_flights(&tail, &range, limit).await?;
    Ok(Json(rows))
}
