use crate::collection::Collection;
use crate::document::Document;
use crate::errors::DbError;

use super::cursor::Cursor;
use super::eval::{apply_projection, compare_docs, eval_filter};
use super::types::{Filter, FindOptions, MAX_LIMIT, MAX_PROJECTION_FIELDS, MAX_SORT_FIELDS};

/// Rejects filters the collection cannot serve.
fn check_plan(col: &Collection, filter: &Filter) -> Result<(), DbError> {
    match filter {
        Filter::Text { fields, .. } if fields.is_empty() => Err(DbError::QueryError(format!(
            "text index required for text search on '{}'",
            col.name_str()
        ))),
        Filter::And(fs) | Filter::Or(fs) => fs.iter().try_for_each(|f| check_plan(col, f)),
        Filter::Not(f) => check_plan(col, f),
        _ => Ok(()),
    }
}

/// Filter, then sort, then project, then skip/limit.
///
/// # Errors
/// Returns `QueryError` if the filter needs an index the collection lacks.
pub fn find_docs(col: &Collection, filter: &Filter, opts: &FindOptions) -> Result<Cursor, DbError> {
    check_plan(col, filter)?;
    let bench_start = std::time::Instant::now();

    let mut docs: Vec<Document> =
        col.get_all_documents().into_iter().filter(|d| eval_filter(&d.data, filter)).collect();
    let matched = docs.len();

    if let Some(sort) = &opts.sort {
        if sort.len() > MAX_SORT_FIELDS {
            log::warn!("sort spec too long: {}", sort.len());
        }
        // stable: equal keys keep insertion order
        docs.sort_by(|a, b| compare_docs(&a.data, &b.data, sort));
    }

    let skip = opts.skip.unwrap_or(0);
    let limit = opts.limit.unwrap_or(usize::MAX).min(MAX_LIMIT);
    let mut docs: Vec<Document> = docs.into_iter().skip(skip).take(limit).collect();

    if let Some(projection) = &opts.projection {
        for d in &mut docs {
            d.data = apply_projection(&d.data, projection, MAX_PROJECTION_FIELDS);
        }
    }

    crate::dev6!(
        "{{\"bench\":\"query\",\"op\":\"find\",\"collection\":\"{}\",\"duration_ms\":{},\"matched\":{},\"result_count\":{},\"limit\":{},\"skip\":{}}}",
        col.name_str(),
        crate::utils::num::u128_to_u64_saturating(bench_start.elapsed().as_millis()),
        crate::utils::num::usize_to_u64(matched),
        crate::utils::num::usize_to_u64(docs.len()),
        crate::utils::num::usize_to_u64(opts.limit.unwrap_or(0)),
        crate::utils::num::usize_to_u64(skip)
    );
    Ok(Cursor::new(docs))
}

/// # Errors
/// Same as [`find_docs`].
pub fn count_docs(col: &Collection, filter: &Filter) -> Result<usize, DbError> {
    check_plan(col, filter)?;
    let start = std::time::Instant::now();
    let n = col.get_all_documents().iter().filter(|d| eval_filter(&d.data, filter)).count();
    crate::dev6!(
        "{{\"bench\":\"query\",\"op\":\"count\",\"collection\":\"{}\",\"duration_ms\":{},\"result_count\":{}}}",
        col.name_str(),
        crate::utils::num::u128_to_u64_saturating(start.elapsed().as_millis()),
        crate::utils::num::usize_to_u64(n)
    );
    Ok(n)
}
