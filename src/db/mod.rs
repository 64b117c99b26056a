// backend/src/db/mod.rs

use sqlx::{Pool, Postgres};

pub mod memory;
pub mod postgres;

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Pool<Postgres>> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!(max_connections, "connected to PostgreSQL");
    Ok(pool)
}
