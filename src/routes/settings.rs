// backend/src/routes/settings.rs

use axum::{extract::State, Json};

use crate::{AppState, error::AppError, models::{FinancialSettings, SettingsUpdate}};

// GET /api/financial-settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<FinancialSettings>, AppError> {
    Ok(Json(state.settings.get_settings().await?))
}

// PUT /api/financial-settings
pub async fn put_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsUpdate>,
) -> Result<Json<FinancialSettings>, AppError> {
    let row = state.settings.update_settings(body).await?;
    tracing::info!(
        revenue_per_hour = %row.revenue_per_hour,
        monthly_fixed_costs = %row.monthly_fixed_costs,
        variable_cost_per_hour = %row.variable_cost_per_hour,
        "financial settings updated"
    );
    Ok(Json(row))
}
