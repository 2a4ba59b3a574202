use crate::errors::DbError;
use bson::{Bson, Document as BsonDocument};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Convert a `serde_json::Value` that must be an object into a `bson::Document`.
///
/// # Errors
/// Returns `Bson` if the value is not an object or holds invalid extended JSON.
pub fn json_value_to_bson_document(val: &Value) -> Result<BsonDocument, DbError> {
    let obj = val.as_object().ok_or_else(|| DbError::Bson("expected JSON object".into()))?;
    BsonDocument::try_from(obj.clone()).map_err(|e| DbError::Bson(e.to_string()))
}

/// Canonical extended JSON keeps every BSON type (dates, int64) intact.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn document_to_ext_json(doc: &BsonDocument) -> Result<Vec<u8>, DbError> {
    let v = Bson::Document(doc.clone()).into_canonical_extjson();
    Ok(serde_json::to_vec(&v)?)
}

/// Inverse of [`document_to_ext_json`].
///
/// # Errors
/// Returns an error if the bytes are not a JSON object in extended JSON form.
pub fn ext_json_to_document(bytes: &[u8]) -> Result<BsonDocument, DbError> {
    let v: Value = serde_json::from_slice(bytes)?;
    json_value_to_bson_document(&v)
}

/// Render a date the way API responses show it.
#[must_use]
pub fn bson_datetime_to_rfc3339(dt: bson::DateTime) -> String {
    DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map_or_else(|| dt.timestamp_millis().to_string(), |d| d.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Plain JSON for output: dates become RFC 3339 strings, numbers stay numbers.
#[must_use]
pub fn bson_to_json(v: &Bson) -> Value {
    match v {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::from(*i),
        Bson::Int64(i) => Value::from(*i),
        Bson::Double(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Bson::String(s) => Value::String(s.clone()),
        Bson::DateTime(dt) => Value::String(bson_datetime_to_rfc3339(*dt)),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(d) => Value::Object(document_to_json_map(d)),
        other => other.clone().into_relaxed_extjson(),
    }
}

#[must_use]
pub fn document_to_json_map(doc: &BsonDocument) -> Map<String, Value> {
    doc.iter().map(|(k, v)| (k.clone(), bson_to_json(v))).collect()
}
