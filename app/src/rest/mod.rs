use crate::error::ServiceError;
use crate::models::area::AreaDao;
use crate::models::experiment::{InstrumentChannelDao, InstrumentExperimentDao};
use crate::models::plot::{PlotDao, PlotSampleDao, PlotSensorAssignmentDao};
use crate::models::project::ProjectDao;
use crate::models::sensor::{SensorDao, SensorDataDao};
use crate::models::soil::{SoilProfileDao, SoilTypeDao};
use crate::models::transect::{TransectDao, TransectNodeDao};
use crate::models::Resource;
use fieldlab_core::EntitySchema;
use sqlx::PgPool;
use std::convert::Infallible;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

mod doc_routes;
mod experiment_routes;
mod metric_routes;
mod query;
mod resource_routes;
mod sensor_routes;

/// Every entity served under `/api/{name}`
pub(crate) static RESOURCES: [&EntitySchema; 13] = [
    ProjectDao::SCHEMA,
    AreaDao::SCHEMA,
    PlotDao::SCHEMA,
    PlotSampleDao::SCHEMA,
    PlotSensorAssignmentDao::SCHEMA,
    SensorDao::SCHEMA,
    SensorDataDao::SCHEMA,
    SoilTypeDao::SCHEMA,
    SoilProfileDao::SCHEMA,
    InstrumentExperimentDao::SCHEMA,
    InstrumentChannelDao::SCHEMA,
    TransectDao::SCHEMA,
    TransectNodeDao::SCHEMA,
];

pub fn routes(
    conn: PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type", "range", "authorization"])
        .expose_headers(vec!["content-range"]);

    api_routes(conn, body_limit)
        .or(doc_routes::swagger(&RESOURCES))
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}

fn api_routes(
    conn: PgPool,
    body_limit: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    metric_routes::routes(&conn)
        .or(experiment_routes::routes(&conn))
        .or(sensor_routes::routes(&conn))
        .or(resource_routes::routes::<ProjectDao>(&conn, body_limit))
        .or(resource_routes::routes::<AreaDao>(&conn, body_limit))
        .or(resource_routes::routes::<PlotDao>(&conn, body_limit))
        .or(resource_routes::routes::<PlotSampleDao>(&conn, body_limit))
        .or(resource_routes::routes::<PlotSensorAssignmentDao>(&conn, body_limit))
        .or(resource_routes::routes::<SensorDao>(&conn, body_limit))
        .or(resource_routes::routes::<SensorDataDao>(&conn, body_limit))
        .or(resource_routes::routes::<SoilTypeDao>(&conn, body_limit))
        .or(resource_routes::routes::<SoilProfileDao>(&conn, body_limit))
        .or(resource_routes::routes::<InstrumentExperimentDao>(&conn, body_limit))
        .or(resource_routes::routes::<InstrumentChannelDao>(&conn, body_limit))
        .or(resource_routes::routes::<TransectDao>(&conn, body_limit))
        .or(resource_routes::routes::<TransectNodeDao>(&conn, body_limit))
}

pub(crate) fn build_response<T: serde::Serialize>(
    resp: Result<T, ServiceError>,
) -> Result<Response, Rejection> {
    build_response_with_status(resp, StatusCode::OK)
}

pub(crate) fn build_response_with_status<T: serde::Serialize>(
    resp: Result<T, ServiceError>,
    status: StatusCode,
) -> Result<Response, Rejection> {
    match resp {
        Ok(data) => Ok(warp::reply::with_status(warp::reply::json(&data), status).into_response()),
        Err(err) => Ok(error_response(err)),
    }
}

pub(crate) fn error_response(err: ServiceError) -> Response {
    match err {
        ServiceError::User(err) => {
            warn!(error = %err, "Rejected request");
            error_reply(err.to_string(), StatusCode::BAD_REQUEST)
        }
        ServiceError::NotFound(err) => {
            warn!(error = %err, "Missing entity");
            error_reply(err.to_string(), StatusCode::NOT_FOUND)
        }
        ServiceError::Conflict(err) => {
            warn!(error = %err, "Conflicting entity");
            error_reply(err.to_string(), StatusCode::CONFLICT)
        }
        ServiceError::Internal(err) => {
            error!(error = %err, "Request failed");
            error_reply("Internal server error", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_reply(detail: impl Into<String>, status: StatusCode) -> Response {
    let body = dto::ErrorResponseDto {
        detail: detail.into(),
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

/// Maps the rejections of warp's own filters onto the JSON error format
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_owned())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        (StatusCode::PAYLOAD_TOO_LARGE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::LengthRequired>() {
        (StatusCode::LENGTH_REQUIRED, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::MethodNotAllowed>() {
        (StatusCode::METHOD_NOT_ALLOWED, e.to_string())
    } else {
        error!(rejection = ?err, "Unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_owned(),
        )
    };
    Ok(error_reply(detail, status))
}

///
/// DTO
///
pub mod dto {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponseDto {
        pub detail: String,
    }
}
