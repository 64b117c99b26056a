// backend/src/db/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{DateRange, FinancialSettings, FlightRecord, SettingsUpdate},
    store::{FlightStore, SettingsStore},
};

/// In-process store used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    flights: RwLock<HashMap<String, FlightRecord>>,
    settings: RwLock<Option<FinancialSettings>>,
}

impl MemoryStore {
    pub fn with_settings(settings: FinancialSettings) -> Self {
        Self {
            flights: RwLock::default(),
            settings: RwLock::new(Some(settings)),
        }
    }
}

#[async_trait]
impl FlightStore for MemoryStore {
    async fn list_flights(
        &self,
        tail_number: &str,
        range: &DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<FlightRecord>, AppError> {
        let flights = self.flights.read().await;
        let mut rows: Vec<FlightRecord> = flights
            .values()
            .filter(|f| f.tail_number == tail_number && range.contains(f.departure_time_utc))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.departure_time_utc
                .cmp(&b.departure_time_utc)
                .then_with(|| a.id.cmp(&b.id))
        });
        if let Some(limit) = limit {
            rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn insert_new(&self, incoming: Vec<FlightRecord>) -> Result<usize, AppError> {
        let mut flights = self.flights.write().await;
        let mut added = 0;
        for f in incoming {
            if flights.contains_key(&f.id) {
                tracing::debug!(id = %f.id, "flight already stored, skipping");
                continue;
            }
            flights.insert(f.id.clone(), f);
            added += 1;
        }
        Ok(added)
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self) -> Result<FinancialSettings, AppError> {
        self.settings
            .read()
            .await
            .clone()
            .ok_or(AppError::ConfigurationMissing)
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<FinancialSettings, AppError> {
        // Held across merge and write so concurrent updates cannot interleave.
        let mut slot = self.settings.write().await;
        let next = update.merge(slot.as_ref(), chrono::Utc::now())?;
        *slot = Some(next.clone());
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn flight(id: &str, tail: &str, departure: &str) -> FlightRecord {
        let departure: DateTime<Utc> = departure.parse().unwrap();
        FlightRecord {
            id: id.into(),
            tail_number: tail.into(),
            departure_airport: "KPAO".into(),
            arrival_airport: "KSQL".into(),
            departure_time_utc: departure,
            arrival_time_utc: departure + Duration::minutes(30),
            flight_duration_minutes: 30,
            hobbs_minutes: 45,
            billable_hours: dec!(0.8),
            estimated_revenue: dec!(120),
            created_at: departure,
        }
    }

    fn january() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_tail_and_inclusive_bounds() {
        let store = MemoryStore::default();
        store
            .insert_new(vec![
                flight("late", "N593EH", "2024-01-31T23:59:59Z"),
                flight("early", "N593EH", "2024-01-01T00:00:00Z"),
                flight("before", "N593EH", "2023-12-31T23:59:59Z"),
                flight("after", "N593EH", "2024-02-01T00:00:00Z"),
                flight("other", "N12345", "2024-01-10T12:00:00Z"),
            ])
            .await
            .unwrap();

        let rows = store.list_flights("N593EH", &january(), None).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
    }

    #[tokio::test]
    async fn limit_keeps_the_earliest_flights() {
        let store = MemoryStore::default();
        store
            .insert_new(vec![
                flight("c", "N593EH", "2024-01-20T10:00:00Z"),
                flight("a", "N593EH", "2024-01-05T10:00:00Z"),
                flight("b", "N593EH", "2024-01-10T10:00:00Z"),
            ])
            .await
            .unwrap();

        let rows = store.list_flights("N593EH", &january(), Some(2)).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn insert_skips_known_ids() {
        let store = MemoryStore::default();
        let first = store
            .insert_new(vec![flight("a", "N593EH", "2024-01-05T10:00:00Z")])
            .await
            .unwrap();
        let second = store
            .insert_new(vec![
                flight("a", "N593EH", "2024-01-05T10:00:00Z"),
                flight("b", "N593EH", "2024-01-06T10:00:00Z"),
            ])
            .await
            .unwrap();
        assert_eq!((first, second), (1, 1));
        assert_eq!(store.list_flights("N593EH", &january(), None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn settings_are_missing_until_written() {
        let store = MemoryStore::default();
        assert!(matches!(
            store.get_settings().await,
            Err(AppError::ConfigurationMissing)
        ));

        let written = store
            .update_settings(SettingsUpdate {
                revenue_per_hour: Some(dec!(150)),
                monthly_fixed_costs: Some(dec!(500)),
                variable_cost_per_hour: Some(dec!(75)),
            })
            .await
            .unwrap();
        assert_eq!(store.get_settings().await.unwrap(), written);
    }

    #[tokio::test]
    async fn concurrent_updates_never_tear() {
        let store = Arc::new(MemoryStore::default());
        store
            .update_settings(SettingsUpdate {
                revenue_per_hour: Some(dec!(100)),
                monthly_fixed_costs: Some(dec!(100)),
                variable_cost_per_hour: Some(dec!(100)),
            })
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..20u32 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                let v = rust_decimal::Decimal::from(i);
                store
                    .update_settings(SettingsUpdate {
                        revenue_per_hour: Some(v),
                        monthly_fixed_costs: Some(v),
                        variable_cost_per_hour: Some(v),
                    })
                    .await
                    .unwrap();
                let seen = store.get_settings().await.unwrap();
                assert_eq!(seen.revenue_per_hour, seen.monthly_fixed_costs);
                assert_eq!(seen.monthly_fixed_costs, seen.variable_cost_per_hour);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
    }
}
