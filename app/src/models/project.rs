use super::Resource;
use chrono::{DateTime, Utc};
use fieldlab_core::{EntitySchema, Field, FieldKind, Relation};
use uuid::Uuid;

static AREAS: Relation = Relation {
    table: "area",
    foreign_key: "project_id",
};

static EXPERIMENTS: Relation = Relation {
    table: "instrumentexperiment",
    foreign_key: "project_id",
};

pub static PROJECTS: EntitySchema = EntitySchema {
    name: "projects",
    table: "project",
    fields: &[
        Field::read_only("id", FieldKind::Id),
        Field::read_only("iterator", FieldKind::Integer),
        Field::new("name", FieldKind::Text),
        Field::new("description", FieldKind::Text),
        Field::new("color", FieldKind::Text),
        Field::read_only("last_updated", FieldKind::Timestamp),
        Field::new("areas", FieldKind::Relation(&AREAS)),
        Field::new("experiments", FieldKind::Relation(&EXPERIMENTS)),
    ],
    search_joins: &[],
    default_order: "iterator",
    touch_column: Some("last_updated"),
};

#[derive(sqlx::FromRow, serde::Serialize, Debug)]
pub struct ProjectDao {
    pub(crate) id: Uuid,
    pub(crate) iterator: i64,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) color: String,
    pub(crate) last_updated: DateTime<Utc>,
}

impl Resource for ProjectDao {
    const SCHEMA: &'static EntitySchema = &PROJECTS;
}
