// backend/src/models/mod.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use rust_decimal_macros::dec;
use sqlx::FromRow;

use crate::error::AppError;

// ───────────────────────────────────────
// Flights
// ───────────────────────────────────────

/// A stored flight. Billing fields are fixed at ingestion and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: String,               // FlightAware fa_flight_id
    pub tail_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(rename = "departureTime")]
    pub departure_time_utc: DateTime<Utc>,
    #[serde(rename = "arrivalTime")]
    pub arrival_time_utc: DateTime<Utc>,
    pub flight_duration_minutes: i32,
    pub hobbs_minutes: i32,
    pub billable_hours: Decimal,
    pub estimated_revenue: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A flight as reported upstream, before billing.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingFlight {
    pub id: String,
    pub tail_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time_utc: DateTime<Utc>,
    pub arrival_time_utc: DateTime<Utc>,
    pub flight_duration_minutes: i32,
}

// ───────────────────────────────────────
// Financial settings (singleton row)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FinancialSettings {
    pub id: i32,
    pub revenue_per_hour: Decimal,
    pub monthly_fixed_costs: Decimal,
    pub variable_cost_per_hour: Decimal,
    pub updated_at: DateTime<Utc>,
}

pub const SETTINGS_ROW_ID: i32 = 1;

/// Rates are stored as NUMERIC(14, 2).
pub const RATE_SCALE: u32 = 2;
pub const MAX_RATE: Decimal = dec!(999999999999.99);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub revenue_per_hour: Option<Decimal>,
    pub monthly_fixed_costs: Option<Decimal>,
    pub variable_cost_per_hour: Option<Decimal>,
}

impl SettingsUpdate {
    /// Builds the replacement record. Fields left out keep their current value;
    /// with nothing stored yet every field must be given.
    pub fn merge(
        self,
        current: Option<&FinancialSettings>,
        now: DateTime<Utc>,
    ) -> Result<FinancialSettings, AppError> {
        let pick = |given: Option<Decimal>, existing: Option<Decimal>, name: &str| -> Result<Decimal, AppError> {
            let value = given
                .or(existing)
                .ok_or_else(|| AppError::validation(format!("Missing required field: {name}")))?;
            if value < Decimal::ZERO {
                return Err(AppError::validation(format!(
                    "Invalid value for {name}: must not be negative"
                )));
            }
            if value > MAX_RATE {
                return Err(AppError::validation(format!(
                    "Invalid value for {name}: must not exceed {MAX_RATE}"
                )));
            }
            if value.normalize().scale() > RATE_SCALE {
                return Err(AppError::validation(format!(
                    "Invalid value for {name}: at most {RATE_SCALE} decimal places"
                )));
            }
            Ok(value)
        };

        Ok(FinancialSettings {
            id: SETTINGS_ROW_ID,
            revenue_per_hour: pick(
                self.revenue_per_hour,
                current.map(|c| c.revenue_per_hour),
                "revenue_per_hour",
            )?,
            monthly_fixed_costs: pick(
                self.monthly_fixed_costs,
                current.map(|c| c.monthly_fixed_costs),
                "monthly_fixed_costs",
            )?,
            variable_cost_per_hour: pick(
                self.variable_cost_per_hour,
                current.map(|c| c.variable_cost_per_hour),
                "variable_cost_per_hour",
            )?,
            updated_at: now,
        })
    }
}

// ───────────────────────────────────────
// Date ranges
// ───────────────────────────────────────

/// Inclusive calendar range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::validation(format!(
                "start_date {start} is after end_date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses raw `start_date` / `end_date` query values.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Err(AppError::validation("start_date and end_date are required"));
        };
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Midnight UTC after the last day.
    pub fn end_instant_exclusive(&self) -> DateTime<Utc> {
        self.end
            .succ_opt()
            .map(|d| d.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_instant() && at < self.end_instant_exclusive()
    }
}

fn parse_day(s: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .map_err(|_| AppError::validation(format!("invalid date '{s}'. Use YYYY-MM-DD")))
}

// ───────────────────────────────────────
// Summary (derived, never stored)
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_flights: usize,
    pub total_flight_minutes: i64,
    pub total_billable_hours: Decimal,
    pub total_revenue: Decimal,
    pub total_variable_costs: Decimal,
    pub total_fixed_costs: Decimal,
    pub net_profit: Decimal,
    pub profit_margin: Decimal,   // ratio, 0 when there is no revenue
    pub breakeven: Breakeven,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakeven {
    pub revenue_per_hour: Decimal,
    pub variable_cost_per_hour: Decimal,
    pub monthly_fixed_costs: Decimal,
    pub total_fixed_costs: Decimal,
    pub profit_margin_per_hour: Decimal,
    pub current_hours: Decimal,
    pub current_revenue: Decimal,
    #[serde(flatten)]
    pub status: BreakevenStatus,
}

impl Breakeven {
    pub fn is_reachable(&self) -> bool {
        matches!(self.status, BreakevenStatus::Reachable(_))
    }

    pub fn target(&self) -> Option<&BreakevenTarget> {
        match &self.status {
            BreakevenStatus::Reachable(target) => Some(target),
            BreakevenStatus::Unreachable => None,
        }
    }
}

/// Unreachable when each billable hour costs at least what it earns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BreakevenStatus {
    Reachable(BreakevenTarget),
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakevenTarget {
    pub breakeven_hours: Decimal,            // per month
    pub breakeven_billable_hours: Decimal,   // scaled to the range
    pub breakeven_revenue: Decimal,
    pub additional_hours_needed: Decimal,
    pub additional_revenue_needed: Decimal,
    pub percentage_to_breakeven: Decimal,    // unclamped
}

// ───────────────────────────────────────
// DTOs helpful for endpoints
// ───────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub added_count: usize,
    pub message: String,
}
