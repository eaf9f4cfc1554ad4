use super::{resource, Resource};
use crate::error::DBError;
use chrono::{DateTime, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use uuid::Uuid;

static DATA: Relation = Relation {
    table: "sensordata",
    foreign_key: "sensor_id",
};

static SENSOR_ASSIGNMENTS: Relation = Relation {
    table: "plotsensorassignment",
    foreign_key: "sensor_id",
};

pub static SENSORS: EntitySchema = EntitySchema {
    name: "sensors",
    table: "sensor",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("description", FieldKind::Text),
        Field::new("comment", FieldKind::Text),
        Field::new("serial_number", FieldKind::Text),
        Field::new("manufacturer", FieldKind::Text),
        Field::new("area_id", FieldKind::Id),
        Field::new("coord_x", FieldKind::Float),
        Field::new("coord_y", FieldKind::Float),
        Field::new("coord_z", FieldKind::Float),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("data", FieldKind::Relation(&DATA)),
        Field::new("assignments", FieldKind::Relation(&SENSOR_ASSIGNMENTS)),
    ],
    search_joins: &[SearchJoin {
        table: "area",
        local_key: "area_id",
        columns: &["name"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct SensorDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) serial_number: Option<String>,
    pub(crate) manufacturer: Option<String>,
    pub(crate) area_id: Uuid,
    pub(crate) coord_x: Option<f64>,
    pub(crate) coord_y: Option<f64>,
    pub(crate) coord_z: Option<f64>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for SensorDao {
    const SCHEMA: &'static EntitySchema = &SENSORS;
}

pub static SENSOR_DATA: EntitySchema = EntitySchema {
    name: "sensor_data",
    table: "sensordata",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("sensor_id", FieldKind::Id),
        Field::new("instrument_seq", FieldKind::Integer),
        Field::new("time_utc", FieldKind::Timestamp),
        Field::new("time_zone", FieldKind::Integer),
        Field::new("temperature_1", FieldKind::Float),
        Field::new("temperature_2", FieldKind::Float),
        Field::new("temperature_3", FieldKind::Float),
        Field::new("temperature_average", FieldKind::Float),
        Field::new("soil_moisture_count", FieldKind::Float),
        Field::new("shake", FieldKind::Integer),
        Field::new("error_flat", FieldKind::Integer),
        Field::read_only("last_updated", FieldKind::Timestamp),
    ],
    search_joins: &[SearchJoin {
        table: "sensor",
        local_key: "sensor_id",
        columns: &["name", "serial_number"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct SensorDataDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) sensor_id: Uuid,
    pub(crate) instrument_seq: i32,
    pub(crate) time_utc: DateTime<Utc>,
    pub(crate) time_zone: Option<i32>,
    pub(crate) temperature_1: Option<f64>,
    pub(crate) temperature_2: Option<f64>,
    pub(crate) temperature_3: Option<f64>,
    pub(crate) temperature_average: Option<f64>,
    pub(crate) soil_moisture_count: Option<f64>,
    pub(crate) shake: Option<i32>,
    pub(crate) error_flat: Option<i32>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for SensorDataDao {
    const SCHEMA: &'static EntitySchema = &SENSOR_DATA;
}

/// Number and time span of the readings of one sensor
#[derive(sqlx::FromRow, serde::Serialize, Debug, PartialEq)]
pub struct SensorDataSummary {
    pub qty_records: i64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// READ the summary of all readings within `[from, until)`, open bounds if `None`
pub async fn data_summary(
    conn: &sqlx::PgPool,
    sensor_id: Uuid,
    from: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> Result<SensorDataSummary, DBError> {
    resource::get::<SensorDao, _>(conn, sensor_id).await?;

    Ok(sqlx::query_as::<_, SensorDataSummary>(
        "SELECT count(*) AS qty_records, \
                min(time_utc) AS start_date, \
                max(time_utc) AS end_date \
         FROM sensordata \
         WHERE sensor_id = $1 \
           AND ($2::timestamptz IS NULL OR time_utc >= $2) \
           AND ($3::timestamptz IS NULL OR time_utc < $3)",
    )
    .bind(sensor_id)
    .bind(from)
    .bind(until)
    .fetch_one(conn)
    .await?)
}
