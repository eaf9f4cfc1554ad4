use super::Resource;
use chrono::{DateTime, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use uuid::Uuid;

static PLOTS: Relation = Relation {
    table: "plot",
    foreign_key: "area_id",
};

static SENSORS: Relation = Relation {
    table: "sensor",
    foreign_key: "area_id",
};

static SOIL_PROFILES: Relation = Relation {
    table: "soilprofile",
    foreign_key: "area_id",
};

pub static AREAS: EntitySchema = EntitySchema {
    name: "areas",
    table: "area",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("description", FieldKind::Text),
        Field::new("project_id", FieldKind::Id),
        Field::new("is_public", FieldKind::Boolean),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("plots", FieldKind::Relation(&PLOTS)),
        Field::new("sensors", FieldKind::Relation(&SENSORS)),
        Field::new("soil_profiles", FieldKind::Relation(&SOIL_PROFILES)),
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
pub struct AreaDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) project_id: Uuid,
    pub(crate) is_public: bool,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for AreaDao {
    const SCHEMA: &'static EntitySchema = &AREAS;
}
