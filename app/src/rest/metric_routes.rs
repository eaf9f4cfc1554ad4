use crate::models;
use sqlx::PgPool;
use warp::http::StatusCode;
use warp::Filter;

pub fn routes(
    conn: &PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(conn.clone())
}

/// GET healthz
///
/// Returns 200 `{"status": "ok"}` if the database answers, 500 otherwise
fn health(
    conn: PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(warp::path!("healthz"))
        .and(warp::get())
        .and_then(|conn: PgPool| async move {
            let (status, code) = match models::check_schema(&conn).await {
                Ok(()) => ("ok", StatusCode::OK),
                Err(err) => {
                    tracing::error!(error = %err, "Health check failed");
                    ("error", StatusCode::INTERNAL_SERVER_ERROR)
                }
            };
            let body = dto::HealthyDto {
                status: status.to_owned(),
            };
            Ok::<_, warp::Rejection>(warp::reply::with_status(warp::reply::json(&body), code))
        })
        .boxed()
}

mod dto {
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct HealthyDto {
        pub status: String,
    }
}
