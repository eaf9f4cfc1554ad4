use super::Resource;
use chrono::{DateTime, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use uuid::Uuid;

static NODES: Relation = Relation {
    table: "transectnode",
    foreign_key: "transect_id",
};

pub static TRANSECTS: EntitySchema = EntitySchema {
    name: "transects",
    table: "transect",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("description", FieldKind::Text),
        Field::new("area_id", FieldKind::Id),
        Field::read_only("date_created", FieldKind::Timestamp),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("nodes", FieldKind::Relation(&NODES)),
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
pub struct TransectDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) area_id: Uuid,
    pub(crate) date_created: Option<DateTime<Utc>>,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for TransectDao {
    const SCHEMA: &'static EntitySchema = &TRANSECTS;
}

/// One plot of a transect, walked in ascending `order`
pub static TRANSECT_NODES: EntitySchema = EntitySchema {
    name: "transect_nodes",
    table: "transectnode",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("transect_id", FieldKind::Id),
        Field::new("plot_id", FieldKind::Id),
        Field::new("order", FieldKind::Integer),
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
pub struct TransectNodeDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) transect_id: Uuid,
    pub(crate) plot_id: Uuid,
    pub(crate) order: i32,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for TransectNodeDao {
    const SCHEMA: &'static EntitySchema = &TRANSECT_NODES;
}
