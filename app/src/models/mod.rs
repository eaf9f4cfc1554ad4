use crate::error::{ApiError, DBError};
use fieldlab_core::EntitySchema;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use std::time::Duration;

/// A table exposed through the generic CRUD routes
pub trait Resource:
    for<'r> sqlx::FromRow<'r, PgRow> + serde::Serialize + Send + Sync + Unpin + 'static
{
    const SCHEMA: &'static EntitySchema;

    /// Checks invariants of a create or update payload that the database
    /// cannot express
    fn validate(_payload: &Map<String, Value>) -> Result<(), ApiError> {
        Ok(())
    }
}

pub async fn establish_db_connection(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, DBError> {
    Ok(PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?)
}

pub async fn migrate(conn: &PgPool) -> Result<(), DBError> {
    sqlx::migrate!("./migrations").run(conn).await?;
    Ok(())
}

pub async fn check_schema(conn: &PgPool) -> Result<(), DBError> {
    sqlx::query("SELECT count(*) AS count FROM project")
        .fetch_one(conn)
        .await?;
    Ok(())
}

#[derive(sqlx::FromRow)]
pub(crate) struct CountRecord {
    pub count: Option<i64>,
}

impl CountRecord {
    pub fn count(self) -> i64 {
        self.count.unwrap_or(0)
    }
}

pub mod area;
pub mod experiment;
pub mod plot;
pub mod project;
pub mod query;
pub mod resource;
pub mod sensor;
pub mod soil;
pub mod transect;

#[cfg(test)]
mod test;
