use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use fieldlab_core::{Direction, EntitySchema, Field, FieldKind, Predicate, QueryPlan, Scalar};
use serde_json::{Map, Value};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

pub(crate) type Builder = QueryBuilder<'static, Postgres>;

/// Quotes an identifier taken from a static schema table
fn ident(name: &str) -> String {
    format!("\"{}\"", name)
}

/// `%needle%` with the LIKE metacharacters of the needle escaped
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub(crate) fn select(schema: &EntitySchema, plan: &QueryPlan) -> Builder {
    let mut builder = Builder::new(format!("SELECT t.* FROM {} t", ident(schema.table)));
    push_where(&mut builder, &plan.predicates);

    match plan.sort {
        Some(sort) => {
            let direction = match sort.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            builder.push(format!(" ORDER BY t.{} {}", ident(sort.column), direction));
            if sort.column != schema.default_order {
                // stable pages for non unique sort columns
                builder.push(format!(", t.{} ASC", ident(schema.default_order)));
            }
        }
        None => {
            builder.push(format!(" ORDER BY t.{} ASC", ident(schema.default_order)));
        }
    }

    if let Some(range) = plan.range {
        builder
            .push(" LIMIT ")
            .push_bind(range.limit())
            .push(" OFFSET ")
            .push_bind(range.offset());
    }
    builder
}

pub(crate) fn count(schema: &EntitySchema, predicates: &[Predicate]) -> Builder {
    let mut builder = Builder::new(format!("SELECT count(*) AS count FROM {} t", ident(schema.table)));
    push_where(&mut builder, predicates);
    builder
}

pub(crate) fn get(schema: &EntitySchema, id: Uuid) -> Builder {
    let mut builder = Builder::new(format!("SELECT * FROM {} WHERE \"id\" = ", ident(schema.table)));
    builder.push_bind(id);
    builder
}

pub(crate) fn insert(
    schema: &'static EntitySchema,
    id: Uuid,
    payload: &Map<String, Value>,
) -> Result<Builder, ApiError> {
    let fields: Vec<&'static Field> = schema
        .writable_columns()
        .filter(|f| payload.contains_key(f.name))
        .collect();

    let mut builder = Builder::new(format!("INSERT INTO {} (\"id\"", ident(schema.table)));
    for field in fields.iter() {
        builder.push(", ").push(ident(field.name));
    }
    builder.push(") VALUES (").push_bind(id);
    for field in fields.iter() {
        builder.push(", ");
        push_value(&mut builder, field, &payload[field.name])?;
    }
    builder.push(") RETURNING *");
    Ok(builder)
}

pub(crate) fn update(
    schema: &'static EntitySchema,
    id: Uuid,
    payload: &Map<String, Value>,
) -> Result<Builder, ApiError> {
    let mut builder = Builder::new(format!("UPDATE {} SET ", ident(schema.table)));
    let mut assignments = 0;
    for field in schema.writable_columns() {
        if let Some(value) = payload.get(field.name) {
            if assignments > 0 {
                builder.push(", ");
            }
            builder.push(format!("{} = ", ident(field.name)));
            push_value(&mut builder, field, value)?;
            assignments += 1;
        }
    }
    if let Some(column) = schema.touch_column {
        if assignments > 0 {
            builder.push(", ");
        }
        builder.push(format!("{} = now()", ident(column)));
        assignments += 1;
    }
    if assignments == 0 {
        builder.push("\"id\" = \"id\"");
    }
    builder.push(" WHERE \"id\" = ").push_bind(id).push(" RETURNING *");
    Ok(builder)
}

pub(crate) fn delete(schema: &EntitySchema, id: Uuid) -> Builder {
    let mut builder = Builder::new(format!("DELETE FROM {} WHERE \"id\" = ", ident(schema.table)));
    builder.push_bind(id);
    builder
}

pub(crate) fn delete_many(schema: &EntitySchema, ids: &[Uuid]) -> Builder {
    let mut builder = Builder::new(format!(
        "DELETE FROM {} WHERE \"id\" = ANY(",
        ident(schema.table)
    ));
    builder.push_bind(ids.to_vec()).push(") RETURNING \"id\"");
    builder
}

fn push_where(builder: &mut Builder, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_predicate(builder, predicate);
    }
}

fn push_predicate(builder: &mut Builder, predicate: &Predicate) {
    match predicate {
        Predicate::Equals(column, value) => {
            builder.push(format!("t.{} = ", ident(column)));
            push_scalar(builder, value);
        }
        Predicate::Contains(column, needle) => {
            push_ilike(builder, "t", column, like_pattern(needle));
        }
        Predicate::IsNull(column) => {
            builder.push(format!("t.{} IS NULL", ident(column)));
        }
        Predicate::Related(relation, exists) => {
            if !exists {
                builder.push("NOT ");
            }
            builder.push(format!(
                "EXISTS (SELECT 1 FROM {} r WHERE r.{} = t.\"id\")",
                ident(relation.table),
                ident(relation.foreign_key)
            ));
        }
        Predicate::Any(inner) if inner.is_empty() => {
            builder.push("FALSE");
        }
        Predicate::Any(inner) => {
            builder.push("(");
            for (i, predicate) in inner.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_predicate(builder, predicate);
            }
            builder.push(")");
        }
        Predicate::Search {
            needle,
            columns,
            joins,
        } => {
            let pattern = like_pattern(needle);
            let mut terms = 0;
            builder.push("(");
            for column in columns.iter() {
                if terms > 0 {
                    builder.push(" OR ");
                }
                push_ilike(builder, "t", column, pattern.clone());
                terms += 1;
            }
            for join in joins.iter().filter(|j| !j.columns.is_empty()) {
                if terms > 0 {
                    builder.push(" OR ");
                }
                builder.push(format!(
                    "EXISTS (SELECT 1 FROM {} j WHERE j.\"id\" = t.{} AND (",
                    ident(join.table),
                    ident(join.local_key)
                ));
                for (i, column) in join.columns.iter().enumerate() {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    push_ilike(builder, "j", column, pattern.clone());
                }
                builder.push("))");
                terms += 1;
            }
            if terms == 0 {
                builder.push("FALSE");
            }
            builder.push(")");
        }
    }
}

fn push_ilike(builder: &mut Builder, alias: &str, column: &str, pattern: String) {
    builder.push(format!(
        "COALESCE(CAST({}.{} AS TEXT), '') ILIKE ",
        alias,
        ident(column)
    ));
    builder.push_bind(pattern);
}

fn push_scalar(builder: &mut Builder, value: &Scalar) {
    match value {
        Scalar::Uuid(v) => builder.push_bind(*v),
        Scalar::Text(v) => builder.push_bind(v.clone()),
        Scalar::Integer(v) => builder.push_bind(*v),
        Scalar::Float(v) => builder.push_bind(*v),
        Scalar::Boolean(v) => builder.push_bind(*v),
    };
}

/// Binds a payload value with the SQL type of its column, JSON null becomes SQL NULL
fn push_value(builder: &mut Builder, field: &Field, value: &Value) -> Result<(), ApiError> {
    let mismatch = || {
        ApiError::Payload(format!(
            "{} does not accept {}",
            field.name,
            value_type(value)
        ))
    };

    match field.kind {
        FieldKind::Id => match value {
            Value::Null => builder.push_bind(None::<Uuid>),
            Value::String(s) => {
                let id = Uuid::parse_str(s)
                    .map_err(|_| ApiError::Payload(format!("{} is not a UUID: {}", field.name, s)))?;
                builder.push_bind(id)
            }
            _ => return Err(mismatch()),
        },
        FieldKind::Text => match value {
            Value::Null => builder.push_bind(None::<String>),
            Value::String(s) => builder.push_bind(s.clone()),
            _ => return Err(mismatch()),
        },
        // writable integer columns are all Postgres INTEGER
        FieldKind::Integer => match value {
            Value::Null => builder.push_bind(None::<i32>),
            Value::Number(n) => {
                let v = n.as_i64().ok_or_else(mismatch)?;
                let v = i32::try_from(v).map_err(|_| {
                    ApiError::Payload(format!("{} is out of range: {}", field.name, v))
                })?;
                builder.push_bind(v)
            }
            _ => return Err(mismatch()),
        },
        FieldKind::Float => match value {
            Value::Null => builder.push_bind(None::<f64>),
            Value::Number(n) => builder.push_bind(n.as_f64().ok_or_else(mismatch)?),
            _ => return Err(mismatch()),
        },
        FieldKind::Boolean => match value {
            Value::Null => builder.push_bind(None::<bool>),
            Value::Bool(b) => builder.push_bind(*b),
            _ => return Err(mismatch()),
        },
        FieldKind::Timestamp => match value {
            Value::Null => builder.push_bind(None::<DateTime<Utc>>),
            Value::String(s) => builder.push_bind(parse_timestamp(s).ok_or_else(mismatch)?),
            _ => return Err(mismatch()),
        },
        FieldKind::Date => match value {
            Value::Null => builder.push_bind(None::<NaiveDate>),
            Value::String(s) => builder.push_bind(parse_date(s).ok_or_else(mismatch)?),
            _ => return Err(mismatch()),
        },
        FieldKind::Json => match value {
            Value::Null => builder.push_bind(None::<Value>),
            other => builder.push_bind(other.clone()),
        },
        FieldKind::Relation(_) => return Err(mismatch()),
    };
    Ok(())
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// RFC 3339, or a naive timestamp read as UTC
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date_naive()))
}
