use bson::{Bson, Document as BsonDocument};
use std::cmp::Ordering;

use super::geo::{central_angle, point_from_bson};
use super::text::text_matches;
use super::types::{CmpOp, Filter, MAX_IN_SET, MAX_PATH_DEPTH, MAX_SORT_FIELDS, Order, Projection, SortSpec};

pub fn eval_filter(doc: &BsonDocument, filter: &Filter) -> bool {
    match filter {
        Filter::True => true,
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Or(fs) => fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Not(f) => !eval_filter(doc, f),
        Filter::Exists { path, exists } => get_path(doc, path).is_some() == *exists,
        Filter::In { path, values } => get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Nin { path, values } => !get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Cmp { path, op, value } => get_path(doc, path).is_some_and(|v| match v {
            // array fields match when the array itself or any element satisfies the comparison
            Bson::Array(items) => {
                cmp_matches(v, *op, value) || items.iter().any(|i| cmp_matches(i, *op, value))
            }
            _ => cmp_matches(v, *op, value),
        }),
        Filter::Text { fields, search } => text_matches(doc, fields, search),
        Filter::GeoWithin { path, center, radius } => get_path(doc, path)
            .and_then(point_from_bson)
            .is_some_and(|p| central_angle(p, *center) <= *radius),
    }
}

fn cmp_matches(v: &Bson, op: CmpOp, value: &Bson) -> bool {
    if op == CmpOp::Eq {
        return values_equal(v, value);
    }
    // Range operators only compare values of the same kind.
    let Some(ord) = compare_same_kind(v, value) else {
        return false;
    };
    match op {
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Gte => ord != Ordering::Less,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Lte => ord != Ordering::Greater,
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    if is_num(a) && is_num(b) {
        return as_f64_num(a).total_cmp(&as_f64_num(b)) == Ordering::Equal;
    }
    a == b
}

fn is_in_set(v: &Bson, set: &[Bson]) -> bool {
    let hit = |x: &Bson| set.iter().take(MAX_IN_SET).any(|s| values_equal(x, s));
    match v {
        Bson::Array(items) => items.iter().any(hit),
        _ => hit(v),
    }
}

/// Resolves a dotted path through nested documents.
pub fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > 1024 {
        return None;
    }
    let mut cur = doc;
    let mut parts = path.split('.').peekable();
    let mut segs = 0usize;
    while let Some(part) = parts.next() {
        segs += 1;
        if segs > MAX_PATH_DEPTH {
            return None;
        }
        let v = cur.get(part)?;
        if parts.peek().is_none() {
            return Some(v);
        }
        match v {
            Bson::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}

pub fn compare_docs(a: &BsonDocument, b: &BsonDocument, sort: &[SortSpec]) -> Ordering {
    for s in sort.iter().take(MAX_SORT_FIELDS) {
        let ord = match (get_path(a, &s.field), get_path(b, &s.field)) {
            (Some(x), Some(y)) => compare_bson(x, y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

fn is_num(x: &Bson) -> bool {
    matches!(x, Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_))
}

#[allow(clippy::cast_precision_loss)]
fn as_f64_num(x: &Bson) -> f64 {
    match x {
        Bson::Int32(i) => f64::from(*i),
        Bson::Int64(i) => *i as f64,
        Bson::Double(f) => *f,
        Bson::Decimal128(d) => d.to_string().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn compare_same_kind(a: &Bson, b: &Bson) -> Option<Ordering> {
    if is_num(a) && is_num(b) {
        return Some(as_f64_num(a).total_cmp(&as_f64_num(b)));
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.timestamp_millis().cmp(&y.timestamp_millis())),
        _ => None,
    }
}

/// Total order used for sorting: same-kind values compare naturally, otherwise by type rank.
pub fn compare_bson(a: &Bson, b: &Bson) -> Ordering {
    compare_same_kind(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b)))
}

fn type_rank(v: &Bson) -> u8 {
    match v {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 1,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 2,
        Bson::String(_) | Bson::Symbol(_) => 3,
        Bson::Document(_) => 4,
        Bson::Array(_) => 5,
        Bson::Binary(_) => 6,
        Bson::ObjectId(_) => 7,
        Bson::Boolean(_) => 8,
        Bson::DateTime(_) => 9,
        Bson::Timestamp(_) => 10,
        Bson::RegularExpression(_) => 11,
        Bson::DbPointer(_) => 12,
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => 13,
        Bson::MaxKey => 255,
    }
}

fn insert_path(out: &mut BsonDocument, path: &str, value: Bson) {
    match path.split_once('.') {
        None => {
            out.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            if !matches!(out.get(head), Some(Bson::Document(_))) {
                out.insert(head.to_string(), BsonDocument::new());
            }
            if let Some(Bson::Document(sub)) = out.get_mut(head) {
                insert_path(sub, rest, value);
            }
        }
    }
}

fn remove_path(doc: &mut BsonDocument, path: &str) {
    match path.split_once('.') {
        None => {
            doc.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Bson::Document(sub)) = doc.get_mut(head) {
                remove_path(sub, rest);
            }
        }
    }
}

pub fn project_fields(doc: &BsonDocument, fields: &[String]) -> BsonDocument {
    let mut out = BsonDocument::new();
    for f in fields {
        if let Some(v) = get_path(doc, f) {
            insert_path(&mut out, f, v.clone());
        }
    }
    out
}

pub fn apply_projection(doc: &BsonDocument, projection: &Projection, max_fields: usize) -> BsonDocument {
    match projection {
        Projection::Include(fields) => {
            let fields: Vec<String> = fields.iter().take(max_fields).cloned().collect();
            project_fields(doc, &fields)
        }
        Projection::Exclude(fields) => {
            let mut out = doc.clone();
            for f in fields.iter().take(max_fields) {
                remove_path(&mut out, f);
            }
            out
        }
    }
}
