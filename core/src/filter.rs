use crate::error::QueryError;
use crate::pagination::Range;
use crate::schema::{EntitySchema, Field, FieldKind, Relation, SearchJoin};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Filter key that triggers the full-text search
pub const SEARCH_FIELD: &str = "q";

/// Typed value of an equality predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Uuid(Uuid),
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(&'static str, Scalar),
    /// Case-insensitive substring match on the column cast to text
    Contains(&'static str, String),
    IsNull(&'static str),
    Related(&'static Relation, bool),
    /// Matches if any of the inner predicates matches, never if empty
    Any(Vec<Predicate>),
    Search {
        needle: String,
        columns: Vec<&'static str>,
        joins: &'static [SearchJoin],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: Direction,
}

/// Compiled form of a list request. Predicates are combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub sort: Option<Sort>,
    pub range: Option<Range>,
}

/// Parsed, still untyped `filter`, `sort` and `range` parameters
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterParams {
    pub filter: Map<String, Value>,
    pub sort: Vec<Value>,
    pub range: Vec<Value>,
}

impl FilterParams {
    pub fn parse(
        filter: Option<&str>,
        sort: Option<&str>,
        range: Option<&str>,
    ) -> Result<Self, QueryError> {
        let filter = match parse_json("filter", filter)? {
            None => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(QueryError::MalformedParameter(
                    "filter",
                    "expected a JSON object".to_owned(),
                ))
            }
        };
        let sort = parse_list("sort", sort)?;
        let range = parse_list("range", range)?;
        Ok(FilterParams {
            filter,
            sort,
            range,
        })
    }
}

fn parse_json(param: &'static str, raw: Option<&str>) -> Result<Option<Value>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| QueryError::MalformedParameter(param, e.to_string())),
    }
}

fn parse_list(param: &'static str, raw: Option<&str>) -> Result<Vec<Value>, QueryError> {
    match parse_json(param, raw)? {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(QueryError::MalformedParameter(
            param,
            "expected a JSON list".to_owned(),
        )),
    }
}

/// Compiles the untyped parameters against the static field table of an entity
pub fn compile(schema: &EntitySchema, params: &FilterParams) -> Result<QueryPlan, QueryError> {
    let mut predicates = Vec::with_capacity(params.filter.len());
    for (name, value) in params.filter.iter() {
        if name == SEARCH_FIELD {
            predicates.push(search(schema, value)?);
            continue;
        }

        let field = schema
            .field(name)
            .ok_or_else(|| QueryError::UnknownField(schema.name, name.clone()))?;
        predicates.push(field_predicate(field, value)?);
    }

    let plan = QueryPlan {
        predicates,
        sort: compile_sort(schema, &params.sort)?,
        range: compile_range(&params.range)?,
    };
    tracing::debug!(entity = schema.name, ?plan, "Compiled filter");
    Ok(plan)
}

fn search(schema: &EntitySchema, value: &Value) -> Result<Predicate, QueryError> {
    let needle = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            return Err(QueryError::InvalidValue(
                SEARCH_FIELD.to_owned(),
                "expected a string".to_owned(),
            ))
        }
    };
    Ok(Predicate::Search {
        needle,
        columns: schema.searchable_fields().map(|f| f.name).collect(),
        joins: schema.search_joins,
    })
}

fn field_predicate(field: &'static Field, value: &Value) -> Result<Predicate, QueryError> {
    match (field.kind, value) {
        (_, Value::Object(_)) => Err(invalid(field, "objects are not supported")),
        (FieldKind::Relation(relation), Value::Bool(exists)) => {
            Ok(Predicate::Related(relation, *exists))
        }
        (FieldKind::Relation(_), _) => Err(invalid(field, "expected a boolean")),
        (_, Value::Null) => Ok(Predicate::IsNull(field.name)),
        (FieldKind::Id, Value::Array(items)) => items
            .iter()
            .map(|item| exact_predicate(field, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Predicate::Any),
        (FieldKind::Id, _) => exact_predicate(field, value),
        (_, Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(Predicate::IsNull(field.name)),
                Value::String(s) => Ok(Predicate::Contains(field.name, s.clone())),
                Value::Number(n) => Ok(Predicate::Contains(field.name, n.to_string())),
                Value::Bool(b) => Ok(Predicate::Contains(field.name, b.to_string())),
                _ => Err(invalid(field, "nested values are not supported")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Predicate::Any),
        (FieldKind::Boolean, Value::Bool(b)) => {
            Ok(Predicate::Equals(field.name, Scalar::Boolean(*b)))
        }
        (_, Value::Bool(_)) => Err(invalid(field, "booleans only apply to flags and relations")),
        (_, Value::Number(_)) => exact_predicate(field, value),
        (_, Value::String(s)) => Ok(Predicate::Contains(field.name, s.clone())),
    }
}

/// Equality predicate with the JSON value coerced to the column type
fn exact_predicate(field: &'static Field, value: &Value) -> Result<Predicate, QueryError> {
    let scalar = match (field.kind, value) {
        (FieldKind::Id, Value::String(s)) => Uuid::parse_str(s)
            .map(Scalar::Uuid)
            .map_err(|e| invalid(field, &e.to_string()))?,
        (FieldKind::Id, _) => return Err(invalid(field, "expected a UUID string")),
        (FieldKind::Integer, Value::Number(n)) => n
            .as_i64()
            .map(Scalar::Integer)
            .ok_or_else(|| invalid(field, "expected an integer"))?,
        (FieldKind::Float, Value::Number(n)) => n
            .as_f64()
            .map(Scalar::Float)
            .ok_or_else(|| invalid(field, "expected a number"))?,
        (FieldKind::Text, Value::Number(n)) => Scalar::Text(n.to_string()),
        _ => return Err(invalid(field, "unsupported value for this field")),
    };
    Ok(Predicate::Equals(field.name, scalar))
}

fn invalid(field: &Field, msg: &str) -> QueryError {
    QueryError::InvalidValue(field.name.to_owned(), msg.to_owned())
}

fn compile_sort(schema: &EntitySchema, sort: &[Value]) -> Result<Option<Sort>, QueryError> {
    let (name, direction) = match sort {
        [Value::String(name), Value::String(direction)] => (name, direction),
        [_, _] => {
            return Err(QueryError::InvalidSort(
                "expected [\"field\", \"ASC\"|\"DESC\"]".to_owned(),
            ))
        }
        _ => return Ok(None),
    };

    let field = schema
        .field(name)
        .filter(|f| f.is_column())
        .ok_or_else(|| QueryError::UnknownField(schema.name, name.clone()))?;
    // the admin UI only sends upper case, lower case "asc" is accepted as well
    let direction = if direction.eq_ignore_ascii_case("ASC") {
        Direction::Asc
    } else {
        Direction::Desc
    };
    Ok(Some(Sort {
        column: field.name,
        direction,
    }))
}

fn compile_range(range: &[Value]) -> Result<Option<Range>, QueryError> {
    match range {
        [] => Ok(None),
        [start, end] => {
            // as_i64 also rejects integers beyond i64::MAX
            let start = start
                .as_i64()
                .ok_or_else(|| QueryError::InvalidRange("start must be an integer up to 2^63-1".to_owned()))?;
            let end = end
                .as_i64()
                .ok_or_else(|| QueryError::InvalidRange("end must be an integer up to 2^63-1".to_owned()))?;
            Range::new(start, end).map(Some)
        }
        _ => Err(QueryError::InvalidRange(
            "expected [start, end]".to_owned(),
        )),
    }
}

#[cfg(test)]
mod test;
