use fieldlab_core::QueryError;
use sqlx::error::ErrorKind;
use std::error;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DBError {
    #[error(transparent)]
    SQLError(sqlx::Error),
    #[error(transparent)]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Did not find {0}: {1}")]
    NotFound(&'static str, Uuid),
    #[error("Duplicate entry: {0}")]
    Duplicate(String),
    #[error("Constraint violated: {0}")]
    Constraint(String),
}

impl From<sqlx::Error> for DBError {
    fn from(err: sqlx::Error) -> Self {
        let kind = err.as_database_error().map(|e| (e.kind(), e.message().to_owned()));
        match kind {
            Some((ErrorKind::UniqueViolation, msg)) => DBError::Duplicate(msg),
            Some((ErrorKind::ForeignKeyViolation, msg))
            | Some((ErrorKind::NotNullViolation, msg))
            | Some((ErrorKind::CheckViolation, msg)) => DBError::Constraint(msg),
            _ => DBError::SQLError(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Invalid payload: {0}")]
    Payload(String),
    #[error("Arguments are not used as specified: {0}")]
    ArgumentError(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    User(Box<dyn error::Error + Send + Sync>),
    #[error(transparent)]
    NotFound(Box<dyn error::Error + Send + Sync>),
    #[error(transparent)]
    Conflict(Box<dyn error::Error + Send + Sync>),
    #[error(transparent)]
    Internal(Box<dyn error::Error + Send + Sync>),
}

impl From<DBError> for ServiceError {
    fn from(err: DBError) -> Self {
        match err {
            DBError::NotFound(..) => ServiceError::NotFound(Box::from(err)),
            DBError::Duplicate(_) => ServiceError::Conflict(Box::from(err)),
            DBError::Constraint(_) => ServiceError::User(Box::from(err)),
            DBError::SQLError(_) | DBError::MigrationError(_) => {
                ServiceError::Internal(Box::from(err))
            }
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        ServiceError::User(Box::from(err))
    }
}

impl From<QueryError> for ServiceError {
    fn from(err: QueryError) -> Self {
        ApiError::from(err).into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err: ServiceError = DBError::NotFound("plots", Uuid::nil()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(
            "Did not find plots: 00000000-0000-0000-0000-000000000000",
            err.to_string()
        );
    }

    #[test]
    fn test_query_errors_are_user_errors() {
        let err: ServiceError = QueryError::InvalidSort("bad".to_owned()).into();
        assert!(matches!(err, ServiceError::User(_)));
    }

    #[test]
    fn test_constraints() {
        let err: ServiceError = DBError::Duplicate("plot name".to_owned()).into();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err: ServiceError = DBError::Constraint("fk".to_owned()).into();
        assert!(matches!(err, ServiceError::User(_)));
    }

    #[test]
    fn test_row_not_found_stays_internal() {
        let err: DBError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DBError::SQLError(_)));
    }
}
