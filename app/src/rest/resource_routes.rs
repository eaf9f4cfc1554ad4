use super::query::ListQuery;
use super::{build_response, build_response_with_status, error_response};
use crate::error::{DBError, ServiceError};
use crate::models::{resource, Resource};
use fieldlab_core::{compile, ContentRange, FilterParams};
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Reply};

/// CRUD routes of one entity under `/api/{name}`
pub fn routes<R: Resource>(
    conn: &PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    list::<R>(conn.clone())
        .or(get_one::<R>(conn.clone()))
        .or(create::<R>(conn.clone(), body_limit))
        .or(update::<R>(conn.clone(), body_limit))
        .or(delete_batch::<R>(conn.clone(), body_limit))
        .or(delete_one::<R>(conn.clone()))
}

fn collection<R: Resource>() -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::path("api").and(warp::path(R::SCHEMA.name))
}

fn json_body(
    body_limit: u64,
) -> impl Filter<Extract = (Map<String, Value>,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(body_limit).and(warp::body::json())
}

/// GET api/{name}?filter=&sort=&range=
///
/// List a filtered, sorted and paginated page
///
/// Returns the page as JSON list and the window plus total in the
/// `Content-Range` header
fn list<R: Resource>(
    conn: PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and_then(|conn: PgPool, query: ListQuery| async move {
            match list_page::<R>(&conn, query).await {
                Ok((items, content_range)) => {
                    let reply = warp::reply::with_header(
                        warp::reply::json(&items),
                        "Content-Range",
                        content_range.to_string(),
                    );
                    Ok::<Response, warp::Rejection>(reply.into_response())
                }
                Err(err) => Ok(error_response(err)),
            }
        })
        .boxed()
}

async fn list_page<R: Resource>(
    conn: &PgPool,
    query: ListQuery,
) -> Result<(Vec<R>, ContentRange), ServiceError> {
    let params = FilterParams::parse(query.filter(), query.sort(), query.range())?;
    let plan = compile(R::SCHEMA, &params)?;

    // page and total from the same snapshot
    let mut tx = conn.begin().await.map_err(DBError::from)?;
    let items = resource::list::<R, _>(&mut *tx, &plan).await?;
    let total = resource::count::<R, _>(&mut *tx, &plan.predicates).await?;
    tx.commit().await.map_err(DBError::from)?;

    let content_range = ContentRange::new(R::SCHEMA.name, plan.range, total.max(0));
    tracing::debug!(entity = R::SCHEMA.name, %content_range, "Listed");
    Ok((items, content_range))
}

/// GET api/{name}/{id}
///
/// Returns the entity or 404
fn get_one<R: Resource>(
    conn: PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::get())
        .and_then(|conn: PgPool, id: Uuid| async move {
            let resp = resource::get::<R, _>(&conn, id).await;
            build_response(resp.map_err(ServiceError::from))
        })
        .boxed()
}

/// POST api/{name}
///
/// Create an entity from a JSON object, unknown and read-only keys are ignored
///
/// Returns 201 with the created entity
fn create<R: Resource>(
    conn: PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body(body_limit))
        .and_then(|conn: PgPool, body: Map<String, Value>| async move {
            let resp = resource::insert::<R, _>(&conn, &body).await;
            build_response_with_status(resp, StatusCode::CREATED)
        })
        .boxed()
}

/// PUT api/{name}/{id}
///
/// Update the supplied writable fields
///
/// Returns the updated entity or 404
fn update<R: Resource>(
    conn: PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::put())
        .and(json_body(body_limit))
        .and_then(|conn: PgPool, id: Uuid, body: Map<String, Value>| async move {
            let resp = resource::update::<R, _>(&conn, id, &body).await;
            build_response(resp)
        })
        .boxed()
}

/// DELETE api/{name}/batch
///
/// Delete all entities of a JSON list of ids
///
/// Returns the ids that were deleted
fn delete_batch<R: Resource>(
    conn: PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path("batch"))
        .and(warp::path::end())
        .and(warp::delete())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and_then(|conn: PgPool, ids: Vec<Uuid>| async move {
            let resp = resource::delete_many::<R, _>(&conn, &ids).await;
            build_response(resp.map_err(ServiceError::from))
        })
        .boxed()
}

/// DELETE api/{name}/{id}
///
/// Returns the id of the deleted entity or 404
fn delete_one<R: Resource>(
    conn: PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(collection::<R>())
        .and(warp::path::param::<Uuid>())
        .and(warp::path::end())
        .and(warp::delete())
        .and_then(|conn: PgPool, id: Uuid| async move {
            let resp = resource::delete::<R, _>(&conn, id).await;
            build_response(resp.map_err(ServiceError::from))
        })
        .boxed()
}
