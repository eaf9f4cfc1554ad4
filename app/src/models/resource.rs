use super::{query, CountRecord, Resource};
use crate::error::{DBError, ServiceError};
use fieldlab_core::{Predicate, QueryPlan};
use serde_json::{Map, Value};
use sqlx::PgExecutor;
use uuid::Uuid;

/// READ a filtered, sorted and paginated page
pub async fn list<'c, R, E>(conn: E, plan: &QueryPlan) -> Result<Vec<R>, DBError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    let mut builder = query::select(R::SCHEMA, plan);
    Ok(builder.build_query_as::<R>().fetch_all(conn).await?)
}

/// Total number of rows matching the predicates, ignoring the range
pub async fn count<'c, R, E>(conn: E, predicates: &[Predicate]) -> Result<i64, DBError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    let mut builder = query::count(R::SCHEMA, predicates);
    let record = builder
        .build_query_as::<CountRecord>()
        .fetch_one(conn)
        .await?;
    Ok(record.count())
}

pub async fn get<'c, R, E>(conn: E, id: Uuid) -> Result<R, DBError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    let mut builder = query::get(R::SCHEMA, id);
    builder
        .build_query_as::<R>()
        .fetch_optional(conn)
        .await?
        .ok_or(DBError::NotFound(R::SCHEMA.name, id))
}

/// CREATE with a server generated id, unknown keys of the payload are ignored
pub async fn insert<'c, R, E>(conn: E, payload: &Map<String, Value>) -> Result<R, ServiceError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    R::validate(payload)?;
    let id = Uuid::new_v4();
    let mut builder = query::insert(R::SCHEMA, id, payload)?;
    let created = builder
        .build_query_as::<R>()
        .fetch_one(conn)
        .await
        .map_err(DBError::from)?;
    tracing::info!(entity = R::SCHEMA.name, %id, "Created");
    Ok(created)
}

/// UPDATE the columns present in the payload
pub async fn update<'c, R, E>(
    conn: E,
    id: Uuid,
    payload: &Map<String, Value>,
) -> Result<R, ServiceError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    R::validate(payload)?;
    let mut builder = query::update(R::SCHEMA, id, payload)?;
    let updated = builder
        .build_query_as::<R>()
        .fetch_optional(conn)
        .await
        .map_err(DBError::from)?
        .ok_or(DBError::NotFound(R::SCHEMA.name, id))?;
    tracing::info!(entity = R::SCHEMA.name, %id, "Updated");
    Ok(updated)
}

pub async fn delete<'c, R, E>(conn: E, id: Uuid) -> Result<Uuid, DBError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    let mut builder = query::delete(R::SCHEMA, id);
    let result = builder.build().execute(conn).await?;
    if result.rows_affected() == 0 {
        return Err(DBError::NotFound(R::SCHEMA.name, id));
    }
    tracing::info!(entity = R::SCHEMA.name, %id, "Deleted");
    Ok(id)
}

/// DELETE all given ids, returns the ids that existed
pub async fn delete_many<'c, R, E>(conn: E, ids: &[Uuid]) -> Result<Vec<Uuid>, DBError>
where
    R: Resource,
    E: PgExecutor<'c>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = query::delete_many(R::SCHEMA, ids);
    let deleted: Vec<Uuid> = builder.build_query_scalar::<Uuid>().fetch_all(conn).await?;
    tracing::info!(
        entity = R::SCHEMA.name,
        requested = ids.len(),
        deleted = deleted.len(),
        "Deleted batch"
    );
    Ok(deleted)
}
