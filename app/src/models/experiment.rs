use super::{resource, Resource};
use crate::error::{ApiError, DBError};
use chrono::{DateTime, Utc};
use fieldlab_core::{Channel, EntitySchema, Field, FieldKind, Relation, SearchJoin};
use serde_json::{Map, Value};
use uuid::Uuid;

static CHANNELS: Relation = Relation {
    table: "instrumentexperimentchannel",
    foreign_key: "experiment_id",
};

pub static INSTRUMENTS: EntitySchema = EntitySchema {
    name: "instruments",
    table: "instrumentexperiment",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("date", FieldKind::Timestamp),
        Field::new("description", FieldKind::Text),
        Field::new("filename", FieldKind::Text),
        Field::new("device_filename", FieldKind::Text),
        Field::new("data_source", FieldKind::Text),
        Field::new("instrument_model", FieldKind::Text),
        Field::new("init_e", FieldKind::Float),
        Field::new("sample_interval", FieldKind::Float),
        Field::new("run_time", FieldKind::Float),
        Field::new("quiet_time", FieldKind::Float),
        Field::new("sensitivity", FieldKind::Float),
        Field::new("samples", FieldKind::Integer),
        Field::new("project_id", FieldKind::Id),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("channels", FieldKind::Relation(&CHANNELS)),
    ],
    search_joins: &[SearchJoin {
        table: "project",
        local_key: "project_id",
        columns: &["name"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct InstrumentExperimentDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: Option<String>,
    pub(crate) date: Option<DateTime<Utc>>,
    pub(crate) description: Option<String>,
    pub(crate) filename: Option<String>,
    pub(crate) device_filename: Option<String>,
    pub(crate) data_source: Option<String>,
    pub(crate) instrument_model: Option<String>,
    pub(crate) init_e: Option<f64>,
    pub(crate) sample_interval: Option<f64>,
    pub(crate) run_time: Option<f64>,
    pub(crate) quiet_time: Option<f64>,
    pub(crate) sensitivity: Option<f64>,
    pub(crate) samples: Option<i32>,
    pub(crate) project_id: Option<Uuid>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for InstrumentExperimentDao {
    const SCHEMA: &'static EntitySchema = &INSTRUMENTS;
}

pub static INSTRUMENT_CHANNELS: EntitySchema = EntitySchema {
    name: "instrument_channels",
    table: "instrumentexperimentchannel",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("channel_name", FieldKind::Text),
        Field::new("experiment_id", FieldKind::Id),
        Field::new("baseline_spline", FieldKind::Json),
        Field::new("time_values", FieldKind::Json),
        Field::new("raw_values", FieldKind::Json),
        Field::new("baseline_values", FieldKind::Json),
        Field::new("baseline_chosen_points", FieldKind::Json),
        Field::new("integral_chosen_pairs", FieldKind::Json),
        Field::new("integral_results", FieldKind::Json),
        Field::read_only("last_updated", FieldKind::Timestamp),
    ],
    search_joins: &[SearchJoin {
        table: "instrumentexperiment",
        local_key: "experiment_id",
        columns: &["name", "filename"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct InstrumentChannelDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) channel_name: String,
    pub(crate) experiment_id: Uuid,
    pub(crate) baseline_spline: Option<Value>,
    pub(crate) time_values: Option<Value>,
    pub(crate) raw_values: Option<Value>,
    pub(crate) baseline_values: Option<Value>,
    pub(crate) baseline_chosen_points: Option<Value>,
    pub(crate) integral_chosen_pairs: Option<Value>,
    pub(crate) integral_results: Option<Value>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl InstrumentChannelDao {
    pub fn into_channel(self) -> Channel {
        Channel::from_json(
            self.channel_name,
            self.time_values.as_ref(),
            self.raw_values.as_ref(),
            self.baseline_values.as_ref(),
            self.integral_results.as_ref(),
        )
    }
}

impl Resource for InstrumentChannelDao {
    const SCHEMA: &'static EntitySchema = &INSTRUMENT_CHANNELS;

    /// Time and raw values are index aligned
    fn validate(payload: &Map<String, Value>) -> Result<(), ApiError> {
        let time_len = payload.get("time_values").and_then(Value::as_array).map(Vec::len);
        let raw_len = payload.get("raw_values").and_then(Value::as_array).map(Vec::len);
        match (time_len, raw_len) {
            (Some(time_len), Some(raw_len)) if time_len != raw_len => {
                Err(ApiError::Payload(format!(
                    "time_values has {} entries but raw_values has {}",
                    time_len, raw_len
                )))
            }
            _ => Ok(()),
        }
    }
}

/// READ all channels of an experiment, sorted by channel name
pub async fn channels(conn: &sqlx::PgPool, experiment_id: Uuid) -> Result<Vec<Channel>, DBError> {
    resource::get::<InstrumentExperimentDao, _>(conn, experiment_id).await?;

    let rows = sqlx::query_as::<_, InstrumentChannelDao>(
        "SELECT * FROM instrumentexperimentchannel \
         WHERE experiment_id = $1 ORDER BY channel_name",
    )
    .bind(experiment_id)
    .fetch_all(conn)
    .await?;
    Ok(rows.into_iter().map(InstrumentChannelDao::into_channel).collect())
}
