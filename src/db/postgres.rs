// backend/src/db/postgres.rs

use async_trait::async_trait;
use sqlx::{query, query_as, Pool, Postgres};

use crate::{
    error::AppError,
    models::{DateRange, FinancialSettings, FlightRecord, SettingsUpdate, SETTINGS_ROW_ID},
    store::{FlightStore, SettingsStore},
};

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FlightStore for PgStore {
    async fn list_flights(
        &self,
        tail_number: &str,
        range: &DateRange,
        limit: Option<i64>,
    ) -> Result<Vec<FlightRecord>, AppError> {
        let rows = query_as::<_, FlightRecord>(
            r#"
            SELECT id, tail_number, departure_airport, arrival_airport,
                   departure_time_utc, arrival_time_utc, flight_duration_minutes,
                   hobbs_minutes, billable_hours, estimated_revenue, created_at
            FROM public.flights
            WHERE tail_number = $1
              AND departure_time_utc >= $2
              AND departure_time_utc < $3
            ORDER BY departure_time_utc, id
            LIMIT $4
            "#,
        )
        .bind(tail_number)
        .bind(range.start_instant())
        .bind(range.end_instant_exclusive())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_new(&self, flights: Vec<FlightRecord>) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut added = 0;
        for f in &flights {
            let res = query(
                r#"
                INSERT INTO public.flights
                    (id, tail_number, departure_airport, arrival_airport,
                     departure_time_utc, arrival_time_utc, flight_duration_minutes,
                     hobbs_minutes, billable_hours, estimated_revenue, created_at)
                VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(&f.id)
            .bind(&f.tail_number)
            .bind(&f.departure_airport)
            .bind(&f.arrival_airport)
            .bind(f.departure_time_utc)
            .bind(f.arrival_time_utc)
            .bind(f.flight_duration_minutes)
            .bind(f.hobbs_minutes)
            .bind(f.billable_hours)
            .bind(f.estimated_revenue)
            .bind(f.created_at)
            .execute(&mut *tx)
            .await?;
            if res.rows_affected() > 0 {
                added += 1;
            } else {
                tracing::debug!(id = %f.id, "flight already stored, skipping");
            }
        }
        tx.commit().await?;
        Ok(added)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_settings(&self) -> Result<FinancialSettings, AppError> {
        query_as::<_, FinancialSettings>(
            r#"SELECT id, revenue_per_hour, monthly_fixed_costs, variable_cost_per_hour, updated_at
               FROM public.financial_settings WHERE id = $1"#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ConfigurationMissing)
    }

    async fn update_settings(&self, update: SettingsUpdate) -> Result<FinancialSettings, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = query_as::<_, FinancialSettings>(
            r#"SELECT id, revenue_per_hour, monthly_fixed_costs, variable_cost_per_hour, updated_at
               FROM public.financial_settings WHERE id = $1 FOR UPDATE"#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&mut *tx)
        .await?;

        let next = update.merge(current.as_ref(), chrono::Utc::now())?;

        let row = query_as::<_, FinancialSettings>(
            r#"
            INSERT INTO public.financial_settings
                (id, revenue_per_hour, monthly_fixed_costs, variable_cost_per_hour, updated_at)
            VALUES ($1,$2,$3,$4,$5)
            ON CONFLICT (id) DO UPDATE
               SET revenue_per_hour = EXCLUDED.revenue_per_hour,
                   monthly_fixed_costs = EXCLUDED.monthly_fixed_costs,
                   variable_cost_per_hour = EXCLUDED.variable_cost_per_hour,
                   updated_at = EXCLUDED.updated_at
            RETURNING id, revenue_per_hour, monthly_fixed_costs, variable_cost_per_hour, updated_at
            "#,
        )
        .bind(next.id)
        .bind(next.revenue_per_hour)
        .bind(next.monthly_fixed_costs)
        .bind(next.variable_cost_per_hour)
        .bind(next.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }
}
