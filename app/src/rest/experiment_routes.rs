use super::query::{ExportFormat, ExportQuery};
use super::{build_response, error_response};
use crate::error::{ApiError, ServiceError};
use crate::models::experiment;
use fieldlab_core::{series_table, summary_table, Channel, SeriesKind, Table};
use sqlx::PgPool;
use uuid::Uuid;
use warp::http::Response;
use warp::{Filter, Reply};

pub fn routes(
    conn: &PgPool,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    table_view(conn.clone(), View::Raw)
        .or(table_view(conn.clone(), View::Filtered))
        .or(table_view(conn.clone(), View::Summary))
}

#[derive(Debug, Clone, Copy)]
enum View {
    Raw,
    Filtered,
    Summary,
}

impl View {
    fn segment(self) -> &'static str {
        match self {
            View::Raw => "raw",
            View::Filtered => "filtered",
            View::Summary => "summary",
        }
    }

    fn render(self, channels: &[Channel]) -> Table {
        match self {
            View::Raw => series_table(channels, SeriesKind::Raw),
            View::Filtered => series_table(channels, SeriesKind::Baseline),
            View::Summary => summary_table(channels),
        }
    }
}

/// GET api/instruments/{id}/raw|filtered|summary?format=json|csv
///
/// Reshape the channels of an experiment into one table
///
/// Returns the table as JSON list of rows with the header first,
/// or as `text/csv` attachment
fn table_view(
    conn: PgPool,
    view: View,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || conn.clone())
        .and(warp::path("api"))
        .and(warp::path("instruments"))
        .and(warp::path::param::<Uuid>())
        .and(warp::path(view.segment()))
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<ExportQuery>())
        .and_then(move |conn: PgPool, id: Uuid, query: ExportQuery| async move {
            let format = match query.format() {
                Some(format) => format,
                None => {
                    let err = ApiError::ArgumentError("format must be json or csv".to_owned());
                    return Ok(error_response(err.into()));
                }
            };

            let table = experiment::channels(&conn, id)
                .await
                .map(|channels| view.render(&channels))
                .map_err(ServiceError::from);
            tracing::debug!(%id, view = view.segment(), ?format, "Reshaped channels");
            match (table, format) {
                (Ok(table), ExportFormat::Csv) => csv_response(&table, id, view),
                (table, _) => build_response(table),
            }
        })
        .boxed()
}

fn csv_response(
    table: &Table,
    id: Uuid,
    view: View,
) -> Result<warp::reply::Response, warp::Rejection> {
    let body = match table.to_csv() {
        Ok(body) => body,
        Err(err) => return Ok(error_response(ServiceError::Internal(Box::new(err)))),
    };
    let disposition = format!(
        "attachment; filename=\"{}_{}.csv\"",
        id,
        view.segment()
    );
    match Response::builder()
        .header("Content-Type", "text/csv; charset=utf-8")
        .header("Content-Disposition", disposition)
        .body(body)
    {
        Ok(resp) => Ok(resp.into_response()),
        Err(err) => Ok(error_response(ServiceError::Internal(Box::new(err)))),
    }
}
