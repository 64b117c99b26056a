// backend/src/billing.rs

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::{FlightRecord, IncomingFlight};

/// Engine run-up and taxi time added on top of airborne time.
pub const GROUND_ENGINE_MINUTES: i32 = 15;

pub fn hobbs_minutes(flight_duration_minutes: i32) -> i32 {
    flight_duration_minutes.max(0) + GROUND_ENGINE_MINUTES
}

/// Hobbs time in hours, rounded up to the next tenth (6 minutes).
pub fn billable_hours(hobbs_minutes: i32) -> Decimal {
    (Decimal::from(hobbs_minutes) / dec!(60))
        .round_dp_with_strategy(1, RoundingStrategy::ToPositiveInfinity)
}

pub fn estimated_revenue(billable_hours: Decimal, revenue_per_hour: Decimal) -> Decimal {
    (billable_hours * revenue_per_hour).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Stamps an upstream flight with its billing at today's rate.
pub fn bill(flight: IncomingFlight, revenue_per_hour: Decimal, now: DateTime<Utc>) -> FlightRecord {
    let hobbs = hobbs_minutes(flight.flight_duration_minutes);
    let hours = billable_hours(hobbs);
    FlightRecord {
        id: flight.id,
        tail_number: flight.tail_number,
        departure_airport: flight.departure_airport,
        arrival_airport: flight.arrival_airport,
        departure_time_utc: flight.departure_time_utc,
        arrival_time_utc: flight.arrival_time_utc,
        flight_duration_minutes: flight.flight_duration_minutes,
        hobbs_minutes: hobbs,
        billable_hours: hours,
        estimated_revenue: estimated_revenue(hours, revenue_per_hour),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hobbs_adds_ground_time() {
        assert_eq!(hobbs_minutes(75), 90);
        assert_eq!(hobbs_minutes(0), 15);
    }

    #[test]
    fn billable_hours_round_up_to_tenths() {
        assert_eq!(billable_hours(90), dec!(1.5));
        assert_eq!(billable_hours(60), dec!(1.0));
        assert_eq!(billable_hours(61), dec!(1.1));
        assert_eq!(billable_hours(67), dec!(1.2));
        assert_eq!(billable_hours(15), dec!(0.3));
    }

    #[test]
    fn revenue_is_rounded_to_cents() {
        assert_eq!(estimated_revenue(dec!(1.5), dec!(150)), dec!(225.00));
        assert_eq!(estimated_revenue(dec!(1.5), dec!(99.99)), dec!(149.99));
    }

    #[test]
    fn bill_fills_every_derived_field() {
        let departure: DateTime<Utc> = "2024-01-15T14:30:00Z".parse().unwrap();
        let flight = IncomingFlight {
            id: "N593EH-1705329000-airline-0001".into(),
            tail_number: "N593EH".into(),
            departure_airport: "KSFO".into(),
            arrival_airport: "KLAX".into(),
            departure_time_utc: departure,
            arrival_time_utc: departure + chrono::Duration::minutes(75),
            flight_duration_minutes: 75,
        };
        let record = bill(flight, dec!(150), departure);
        assert_eq!(record.hobbs_minutes, 90);
        assert_eq!(record.billable_hours, dec!(1.5));
        assert_eq!(record.estimated_revenue, dec!(225));
        assert_eq!(record.created_at, departure);
    }
}
