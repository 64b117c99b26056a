// backend/src/refresh.rs

use chrono::{Duration, Utc};

use crate::{
    billing,
    error::AppError,
    models::RefreshOutcome,
    store::{FlightSource, FlightStore, SettingsStore},
};

/// Pulls the last `window_days` of history for `tail_number` and stores the
/// flights not seen before, billed at the current revenue rate.
pub async fn refresh_flights(
    source: &dyn FlightSource,
    flights: &dyn FlightStore,
    settings: &dyn SettingsStore,
    tail_number: &str,
    window_days: i64,
) -> Result<RefreshOutcome, AppError> {
    let rates = settings.get_settings().await?;
    let to = Utc::now();
    let from = to - Duration::days(window_days);

    tracing::info!(tail_number, window_days, "starting data refresh");
    let incoming = source.fetch_history(tail_number, from, to).await?;
    if incoming.is_empty() {
        return Ok(RefreshOutcome {
            added_count: 0,
            message: "No new data fetched from FlightAware.".to_string(),
        });
    }

    let fetched = incoming.len();
    let records = incoming
        .into_iter()
        .map(|f| billing::bill(f, rates.revenue_per_hour, to))
        .collect();
    let added = flights.insert_new(records).await?;

    let message = format!("Data refreshed successfully. Stored {added} new flights.");
    tracing::info!(fetched, added, "{message}");
    Ok(RefreshOutcome {
        added_count: added,
        message,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        models::{DateRange, FinancialSettings, IncomingFlight, SETTINGS_ROW_ID},
    };
    use async_trait::async_trait;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    /// Returns a fixed batch, or fails like an unreachable upstream.
    pub(crate) struct ScriptedSource(pub Option<Vec<IncomingFlight>>);

    #[async_trait]
    impl FlightSource for ScriptedSource {
        async fn fetch_history(
            &self,
            _tail_number: &str,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> Result<Vec<IncomingFlight>, AppError> {
            self.0
                .clone()
                .ok_or_else(|| AppError::UpstreamUnavailable("connection refused".into()))
        }
    }

    pub(crate) fn incoming(id: &str, minutes: i64) -> IncomingFlight {
        let departure = Utc::now() - Duration::days(2);
        IncomingFlight {
            id: id.into(),
            tail_number: "N593EH".into(),
            departure_airport: "KSFO".into(),
            arrival_airport: "KLAX".into(),
            departure_time_utc: departure,
            arrival_time_utc: departure + Duration::minutes(minutes),
            flight_duration_minutes: i32::try_from(minutes).unwrap(),
        }
    }

    pub(crate) fn rates() -> FinancialSettings {
        FinancialSettings {
            id: SETTINGS_ROW_ID,
            revenue_per_hour: dec!(150),
            monthly_fixed_costs: dec!(500),
            variable_cost_per_hour: dec!(75),
            updated_at: Utc::now(),
        }
    }

    fn last_week() -> DateRange {
        let today = Utc::now().date_naive();
        DateRange::new(today - Duration::days(7), today).unwrap()
    }

    #[tokio::test]
    async fn refresh_counts_only_new_flights() {
        let store = MemoryStore::with_settings(rates());
        let source = ScriptedSource(Some(vec![incoming("a", 75), incoming("b", 45)]));

        let first = refresh_flights(&source, &store, &store, "N593EH", 90).await.unwrap();
        assert_eq!(first.added_count, 2);
        assert!(first.message.contains("Stored 2 new flights"));

        let again = refresh_flights(&source, &store, &store, "N593EH", 90).await.unwrap();
        assert_eq!(again.added_count, 0);
    }

    #[tokio::test]
    async fn refreshed_flights_are_billed_at_ingestion() {
        let store = MemoryStore::with_settings(rates());
        let source = ScriptedSource(Some(vec![incoming("a", 75)]));
        refresh_flights(&source, &store, &store, "N593EH", 90).await.unwrap();

        let stored = store.list_flights("N593EH", &last_week(), None).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].hobbs_minutes, 90);
        assert_eq!(stored[0].billable_hours, dec!(1.5));
        assert_eq!(stored[0].estimated_revenue, dec!(225));
    }

    #[tokio::test]
    async fn empty_fetch_reports_no_new_data() {
        let store = MemoryStore::with_settings(rates());
        let outcome = refresh_flights(&ScriptedSource(Some(vec![])), &store, &store, "N593EH", 90)
            .await
            .unwrap();
        assert_eq!(outcome.added_count, 0);
        assert!(outcome.message.to_lowercase().contains("no new data"));
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let store = MemoryStore::with_settings(rates());
        let err = refresh_flights(&ScriptedSource(None), &store, &store, "N593EH", 90)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn refresh_needs_a_revenue_rate() {
        let store = MemoryStore::default();
        let err = refresh_flights(&ScriptedSource(Some(vec![incoming("a", 60)])), &store, &store, "N593EH", 90)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigurationMissing));
    }
}
