use super::build_response;
use super::query::DateQuery;
use crate::error::{ApiError, ServiceError};
use crate::models::sensor;
use sqlx::PgPool;
use uuid::Uuid;
use warp::Filter;

pub fn routes(
    conn: &PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    data_summary(conn.clone())
}

/// GET api/sensors/{id}/summary?from=&until=
///
/// Summarize the readings of a sensor, both bounds are optional RFC 3339
/// timestamps
///
/// Returns a `SensorDataSummary` with the record count and the first and
/// last reading time
fn data_summary(
    conn: PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(warp::path!("api" / "sensors" / Uuid / "summary"))
        .and(warp::get())
        .and(warp::query::<DateQuery>())
        .and_then(|conn: PgPool, sensor_id: Uuid, query: DateQuery| async move {
            if !query.is_valid() {
                let err = ApiError::ArgumentError("from must be before until".to_owned());
                return build_response::<()>(Err(err.into()));
            }
            let resp = sensor::data_summary(&conn, sensor_id, query.from(), query.until())
                .await
                .map_err(ServiceError::from);
            build_response(resp)
        })
        .boxed()
}
