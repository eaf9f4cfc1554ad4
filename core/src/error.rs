use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    MalformedParameter(&'static str, std::string::String),
    UnknownField(&'static str, std::string::String),
    InvalidValue(std::string::String, std::string::String),
    InvalidSort(std::string::String),
    InvalidRange(std::string::String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QueryError::MalformedParameter(param, msg) => {
                write!(f, "Malformed '{}' parameter: {}", param, msg)
            }
            QueryError::UnknownField(entity, field) => {
                write!(f, "Unknown field '{}' on {}", field, entity)
            }
            QueryError::InvalidValue(field, msg) => {
                write!(f, "Invalid value for '{}': {}", field, msg)
            }
            QueryError::InvalidSort(msg) => write!(f, "Invalid sort: {}", msg),
            QueryError::InvalidRange(msg) => write!(f, "Invalid range: {}", msg),
        }
    }
}

impl error::Error for QueryError {}
