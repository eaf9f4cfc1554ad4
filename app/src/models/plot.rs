use super::Resource;
use chrono::{DateTime, NaiveDate, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use uuid::Uuid;

static SAMPLES: Relation = Relation {
    table: "plotsample",
    foreign_key: "plot_id",
};

static PLOT_ASSIGNMENTS: Relation = Relation {
    table: "plotsensorassignment",
    foreign_key: "plot_id",
};

pub static PLOTS: EntitySchema = EntitySchema {
    name: "plots",
    table: "plot",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("area_id", FieldKind::Id),
        Field::new("gradient", FieldKind::Text),
        Field::new("vegetation_type", FieldKind::Text),
        Field::new("topography", FieldKind::Text),
        Field::new("aspect", FieldKind::Text),
        Field::new("created_on", FieldKind::Date),
        Field::new("weather", FieldKind::Text),
        Field::new("lithology", FieldKind::Text),
        Field::new("image", FieldKind::Text),
        Field::new("coord_x", FieldKind::Float),
        Field::new("coord_y", FieldKind::Float),
        Field::new("coord_z", FieldKind::Float),
        Field::new("coord_srid", FieldKind::Integer),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("samples", FieldKind::Relation(&SAMPLES)),
        Field::new("sensor_assignments", FieldKind::Relation(&PLOT_ASSIGNMENTS)),
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
pub struct PlotDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) area_id: Uuid,
    pub(crate) gradient: String,
    pub(crate) vegetation_type: Option<String>,
    pub(crate) topography: Option<String>,
    pub(crate) aspect: Option<String>,
    pub(crate) created_on: Option<NaiveDate>,
    pub(crate) weather: Option<String>,
    pub(crate) lithology: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) coord_x: Option<f64>,
    pub(crate) coord_y: Option<f64>,
    pub(crate) coord_z: Option<f64>,
    pub(crate) coord_srid: Option<i32>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for PlotDao {
    const SCHEMA: &'static EntitySchema = &PLOTS;
}

pub static PLOT_SAMPLES: EntitySchema = EntitySchema {
    name: "plot_samples",
    table: "plotsample",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("plot_id", FieldKind::Id),
        Field::new("upper_depth_cm", FieldKind::Float),
        Field::new("lower_depth_cm", FieldKind::Float),
        Field::new("replicate", FieldKind::Integer),
        Field::new("sample_weight", FieldKind::Float),
        Field::new("subsample_weight", FieldKind::Float),
        Field::new("ph", FieldKind::Float),
        Field::new("rh", FieldKind::Float),
        Field::new("loi", FieldKind::Float),
        Field::new("mfc", FieldKind::Float),
        Field::new("c", FieldKind::Float),
        Field::new("n", FieldKind::Float),
        Field::new("cn", FieldKind::Float),
        Field::new("clay_percent", FieldKind::Float),
        Field::new("silt_percent", FieldKind::Float),
        Field::new("sand_percent", FieldKind::Float),
        Field::new("created_on", FieldKind::Date),
        Field::read_only("last_updated", FieldKind::Timestamp),
    ],
    search_joins: &[SearchJoin {
        table: "plot",
        local_key: "plot_id",
        columns: &["name"],
    }],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct PlotSampleDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) plot_id: Uuid,
    pub(crate) upper_depth_cm: f64,
    pub(crate) lower_depth_cm: f64,
    pub(crate) replicate: i32,
    pub(crate) sample_weight: Option<f64>,
    pub(crate) subsample_weight: Option<f64>,
    pub(crate) ph: Option<f64>,
    pub(crate) rh: Option<f64>,
    pub(crate) loi: Option<f64>,
    pub(crate) mfc: Option<f64>,
    pub(crate) c: Option<f64>,
    pub(crate) n: Option<f64>,
    pub(crate) cn: Option<f64>,
    pub(crate) clay_percent: Option<f64>,
    pub(crate) silt_percent: Option<f64>,
    pub(crate) sand_percent: Option<f64>,
    pub(crate) created_on: Option<NaiveDate>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for PlotSampleDao {
    const SCHEMA: &'static EntitySchema = &PLOT_SAMPLES;
}

pub static PLOT_SENSOR_ASSIGNMENTS: EntitySchema = EntitySchema {
    name: "plot_sensor_assignments",
    table: "plotsensorassignment",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("plot_id", FieldKind::Id),
        Field::new("sensor_id", FieldKind::Id),
        Field::new("date_from", FieldKind::Timestamp),
        Field::new("date_to", FieldKind::Timestamp),
        Field::new("depth_cm", FieldKind::Integer),
        Field::new("notes", FieldKind::Text),
        Field::read_only("last_updated", FieldKind::Timestamp),
    ],
    search_joins: &[
        SearchJoin {
            table: "plot",
            local_key: "plot_id",
            columns: &["name"],
        },
        SearchJoin {
            table: "sensor",
            local_key: "sensor_id",
            columns: &["name", "serial_number"],
        },
    ],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct PlotSensorAssignmentDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) plot_id: Uuid,
    pub(crate) sensor_id: Uuid,
    pub(crate) date_from: DateTime<Utc>,
    pub(crate) date_to: DateTime<Utc>,
    pub(crate) depth_cm: i32,
    pub(crate) notes: Option<String>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for PlotSensorAssignmentDao {
    const SCHEMA: &'static EntitySchema = &PLOT_SENSOR_ASSIGNMENTS;
}
