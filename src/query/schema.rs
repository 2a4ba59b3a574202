use crate::errors::DbError;
use bson::Bson;
use chrono::{DateTime, NaiveDate, Utc};

/// Storage type of a record field, used to cast query-string text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Date,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(path: &'static str, kind: FieldKind) -> Self {
        Self { path, kind }
    }
}

#[must_use]
pub fn kind_of(schema: &[FieldSpec], path: &str) -> Option<FieldKind> {
    schema.iter().find(|f| f.path == path).map(|f| f.kind)
}

fn parse_number(raw: &str) -> Option<Bson> {
    let t = raw.trim();
    if let Ok(i) = t.parse::<i64>() {
        return Some(Bson::Int64(i));
    }
    t.parse::<f64>().ok().filter(|f| f.is_finite()).map(Bson::Double)
}

fn parse_date(raw: &str) -> Option<Bson> {
    let t = raw.trim();
    let dt = DateTime::parse_from_rfc3339(t).map(|d| d.with_timezone(&Utc)).ok().or_else(|| {
        NaiveDate::parse_from_str(t, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0).map(|n| n.and_utc())
    })?;
    Some(Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis())))
}

fn parse_bool(raw: &str) -> Option<Bson> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(Bson::Boolean(true)),
        "false" | "0" => Some(Bson::Boolean(false)),
        _ => None,
    }
}

/// Converts query-string text into a typed value.
///
/// A field with a declared kind must parse as that kind. Undeclared fields
/// become integers, floats or booleans when they read as such, text otherwise.
///
/// # Errors
/// Returns `MalformedQuery` when a declared field's value does not parse.
pub fn cast_value(path: &str, raw: &str, kind: Option<FieldKind>) -> Result<Bson, DbError> {
    let bad = |what: &str| DbError::MalformedQuery(format!("'{raw}' is not a valid {what} for '{path}'"));
    match kind {
        Some(FieldKind::String) => Ok(Bson::String(raw.to_string())),
        Some(FieldKind::Number) => parse_number(raw).ok_or_else(|| bad("number")),
        Some(FieldKind::Date) => parse_date(raw).ok_or_else(|| bad("date")),
        Some(FieldKind::Bool) => parse_bool(raw).ok_or_else(|| bad("boolean")),
        None => Ok(parse_number(raw)
            .or_else(|| match raw {
                "true" => Some(Bson::Boolean(true)),
                "false" => Some(Bson::Boolean(false)),
                _ => None,
            })
            .unwrap_or_else(|| Bson::String(raw.to_string()))),
    }
}
