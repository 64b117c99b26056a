// backend/src/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{DateRange, FinancialSettings, FlightRecord, IncomingFlight, SettingsUpdate},
};

#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Flights of `tail_number` departing inside `range`, ordered by departure.
    /// `limit` keeps only the earliest rows.
    async fn list_flights(
        &self,
        tail_number: &str,
        range: &DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<FlightRecord>, AppError>;

    /// Stores flights whose id is not yet known; returns how many were added.
    async fn insert_new(&self, flights: Vec<FlightRecord>) -> Result<usize, AppError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fails with `ConfigurationMissing` until the first write.
    async fn get_settings(&self) -> Result<FinancialSettings, AppError>;

    /// Replaces the stored rates in one step.
    async fn update_settings(&self, update: SettingsUpdate) -> Result<FinancialSettings, AppError>;
}

/// Upstream flight history feed.
#[async_trait]
pub trait FlightSource: Send + Sync {
    async fn fetch_history(
        &self,
        tail_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IncomingFlight>, AppError>;
}
