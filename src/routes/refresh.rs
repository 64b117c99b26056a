// backend/src/routes/refresh.rs

use axum::{extract::State, Json};

use crate::{AppState, error::AppError, models::RefreshOutcome, refresh::refresh_flights};

// POST /api/refresh_data
pub async fn refresh_data(
    State(state): State<AppState>,
) -> Result<Json<RefreshOutcome>, AppError> {
    let source = state.source.as_deref().ok_or(AppError::SourceNotConfigured)?;
    let outcome = refresh_flights(
        source,
        state.flights.as_ref(),
        state.settings.as_ref(),
        &state.config.default_tail_number,
        state.config.refresh_window_days,
    )
    .await?;
    Ok(Json(outcome))
}
