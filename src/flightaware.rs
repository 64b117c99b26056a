// backend/src/flightaware.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    config::FlightAwareConfig,
    error::AppError,
    models::IncomingFlight,
    store::FlightSource,
};

// ─────────────────────────────────────────────────────────────────────────────
// AeroAPI response models
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FlightsResponse {
    #[serde(default)]
    pub flights: Vec<AeroFlight>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AeroAirport {
    pub icao: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AeroFlight {
    pub fa_flight_id: Option<String>,
    pub ident: Option<String>,
    pub origin: Option<AeroAirport>,
    pub destination: Option<AeroAirport>,
    #[serde(default)]
    pub cancelled: bool,
    pub actual_off: Option<String>,
    pub actual_out: Option<String>,
    pub scheduled_off: Option<String>,
    pub scheduled_out: Option<String>,
    pub filed_departure_time: Option<String>,
    pub actual_on: Option<String>,
    pub actual_in: Option<String>,
    pub scheduled_on: Option<String>,
    pub scheduled_in: Option<String>,
    pub filed_arrival_time: Option<String>,
}

impl AeroFlight {
    fn departure(&self) -> Option<&str> {
        [
            &self.actual_off,
            &self.actual_out,
            &self.scheduled_off,
            &self.scheduled_out,
            &self.filed_departure_time,
        ]
        .into_iter()
        .find_map(|t| t.as_deref())
    }

    fn arrival(&self) -> Option<&str> {
        [
            &self.actual_on,
            &self.actual_in,
            &self.scheduled_on,
            &self.scheduled_in,
            &self.filed_arrival_time,
        ]
        .into_iter()
        .find_map(|t| t.as_deref())
    }
}

fn airport(a: &Option<AeroAirport>) -> Option<String> {
    let a = a.as_ref()?;
    a.icao.clone().or_else(|| a.code.clone())
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Turns raw AeroAPI flights into incoming records, keeping only those that
/// departed inside `[from, to]`. Cancelled and incomplete entries are skipped.
pub fn process_flights(
    raw: Vec<AeroFlight>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<IncomingFlight> {
    let total = raw.len();
    let mut out = Vec::with_capacity(total);

    for f in raw {
        let label = f.fa_flight_id.clone().unwrap_or_else(|| "unknown".into());
        if f.cancelled {
            tracing::info!(flight = %label, "skipping cancelled flight");
            continue;
        }

        let departure = f.departure().and_then(parse_time);
        let arrival = f.arrival().and_then(parse_time);
        let (Some(id), Some(tail), Some(dep_ap), Some(arr_ap), Some(departure), Some(arrival)) = (
            f.fa_flight_id.clone(),
            f.ident.clone(),
            airport(&f.origin),
            airport(&f.destination),
            departure,
            arrival,
        ) else {
            tracing::warn!(flight = %label, "skipping incomplete flight record");
            continue;
        };

        if departure < from || departure > to {
            continue;
        }

        let mut minutes = (arrival - departure).num_minutes();
        if minutes < 0 {
            tracing::warn!(flight = %id, "negative duration, setting to 0");
            minutes = 0;
        }

        out.push(IncomingFlight {
            id,
            tail_number: tail,
            departure_airport: dep_ap,
            arrival_airport: arr_ap,
            departure_time_utc: departure,
            arrival_time_utc: arrival,
            flight_duration_minutes: i32::try_from(minutes).unwrap_or(i32::MAX),
        });
    }

    tracing::info!(total, kept = out.len(), "processed FlightAware flights");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

pub struct FlightAwareClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FlightAwareClient {
    /// `None` when no API key is configured.
    pub fn from_config(config: &FlightAwareConfig) -> Result<Option<Self>, AppError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::UpstreamUnavailable(format!("reqwest build error: {e}")))?;
        Ok(Some(Self {
            http,
            base_url: config.base_url.clone(),
            api_key,
        }))
    }
}

#[async_trait]
impl FlightSource for FlightAwareClient {
    async fn fetch_history(
        &self,
        tail_number: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<IncomingFlight>, AppError> {
        let url = format!("{}/flights/{}", self.base_url, tail_number);
        tracing::info!(tail_number, %url, "fetching flights from FlightAware");

        let body: FlightsResponse = self
            .http
            .get(&url)
            .header("x-apikey", &self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(process_flights(body.flights, from, to))
    }
}
