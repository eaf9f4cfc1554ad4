use super::Resource;
use chrono::{DateTime, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use serde_json::Value;
use uuid::Uuid;

static PROFILES: Relation = Relation {
    table: "soilprofile",
    foreign_key: "soil_type_id",
};

pub static SOIL_TYPES: EntitySchema = EntitySchema {
    name: "soil_types",
    table: "soiltype",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("description", FieldKind::Text),
        Field::new("image", FieldKind::Text),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("profiles", FieldKind::Relation(&PROFILES)),
    ],
    search_joins: &[],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct SoilTypeDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) image: Option<String>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for SoilTypeDao {
    const SCHEMA: &'static EntitySchema = &SOIL_TYPES;
}

pub static SOIL_PROFILES: EntitySchema = EntitySchema {
    name: "soil_profiles",
    table: "soilprofile",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("profile_iterator", FieldKind::Integer),
        Field::new("gradient", FieldKind::Text),
        Field::new("description_horizon", FieldKind::Json),
        Field::new("weather", FieldKind::Text),
        Field::new("topography", FieldKind::Text),
        Field::new("vegetation_type", FieldKind::Text),
        Field::new("aspect", FieldKind::Text),
        Field::new("lythology_surficial_deposit", FieldKind::Text),
        Field::new("created_on", FieldKind::Timestamp),
        Field::new("soil_type_id", FieldKind::Id),
        Field::new("area_id", FieldKind::Id),
        Field::new("soil_diagram", FieldKind::Text),
        Field::new("photo", FieldKind::Text),
        Field::new("parent_material", FieldKind::Float),
        Field::new("coord_x", FieldKind::Float),
        Field::new("coord_y", FieldKind::Float),
        Field::new("coord_z", FieldKind::Float),
        Field::new("coord_srid", FieldKind::Integer),
        Field::read_only("last_updated", FieldKind::Timestamp),
    ],
    search_joins: &[
        SearchJoin {
            table: "area",
            local_key: "area_id",
            columns: &["name"],
        },
        SearchJoin {
            table: "soiltype",
            local_key: "soil_type_id",
            columns: &["name"],
        },
    ],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct SoilProfileDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) profile_iterator: i32,
    pub(crate) gradient: String,
    pub(crate) description_horizon: Option<Value>,
    pub(crate) weather: Option<String>,
    pub(crate) topography: Option<String>,
    pub(crate) vegetation_type: Option<String>,
    pub(crate) aspect: Option<String>,
    pub(crate) lythology_surficial_deposit: Option<String>,
    pub(crate) created_on: Option<DateTime<Utc>>,
    pub(crate) soil_type_id: Uuid,
    pub(crate) area_id: Uuid,
    pub(crate) soil_diagram: Option<String>,
    pub(crate) photo: Option<String>,
    pub(crate) parent_material: Option<f64>,
    pub(crate) coord_x: Option<f64>,
    pub(crate) coord_y: Option<f64>,
    pub(crate) coord_z: Option<f64>,
    pub(crate) coord_srid: Option<i32>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for SoilProfileDao {
    const SCHEMA: &'static EntitySchema = &SOIL_PROFILES;
}
