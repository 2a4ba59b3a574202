//! Turns request query parameters into a filtered, sorted, projected and paged
//! [`QueryDescriptor`].
//!
//! ```text
//! ?experience=5+Years%2B&salary[gte]=80000&sort=-postingDate&page=2
//!   filter  -> experience == "5 Years+" AND salary >= 80000
//!   sort    -> postingDate desc
//!   paging  -> skip (page - 1) * per_page, take per_page
//! ```
//!
//! Each stage only reads its own parameters, so stages can be applied in any
//! subset. Reserved parameters (`sort`, `fields`, `keyword`, `page`, `limit`)
//! never become filter criteria.

use crate::document::Document;
use crate::errors::DbError;
use bson::Bson;

use super::descriptor::QueryDescriptor;
use super::raw::{RawQuery, is_reserved};
use super::schema::{FieldSpec, cast_value, kind_of};
use super::types::{CmpOp, Filter, MAX_IN_SET, Projection, SortSpec};

/// Ordering applied when the request names none.
pub const DEFAULT_SORT_FIELD: &str = "postingDate";
/// Internal revision counter hidden from results unless asked for.
pub const VERSION_FIELD: &str = "__v";

/// Splits `salary[gte]` into `("salary", Some("gte"))`; plain keys have no operator.
fn split_key(key: &str) -> Result<(&str, Option<&str>), DbError> {
    let malformed = || DbError::MalformedQuery(format!("malformed parameter name '{key}'"));
    let Some(open) = key.find('[') else {
        return if key.contains(']') { Err(malformed()) } else { Ok((key, None)) };
    };
    let field = &key[..open];
    let op = key[open + 1..].strip_suffix(']').ok_or_else(malformed)?;
    if field.is_empty() || op.contains(['[', ']']) {
        return Err(malformed());
    }
    Ok((field, Some(op)))
}

fn comparison(op: &str) -> Option<CmpOp> {
    match op {
        "gt" => Some(CmpOp::Gt),
        "gte" => Some(CmpOp::Gte),
        "lt" => Some(CmpOp::Lt),
        "lte" => Some(CmpOp::Lte),
        _ => None,
    }
}

fn and_all(filters: Vec<Filter>) -> Filter {
    filters.into_iter().fold(Filter::True, Filter::and)
}

/// Comma or whitespace separated names, empty entries dropped.
fn split_list(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty())
}

fn parse_sort(spec: &str) -> Vec<SortSpec> {
    split_list(spec)
        .filter_map(|tok| match tok.strip_prefix('-') {
            Some(f) if !f.is_empty() => Some(SortSpec::desc(f)),
            Some(_) => None,
            None => Some(SortSpec::asc(tok)),
        })
        .collect()
}

pub struct QueryBuilder {
    descriptor: QueryDescriptor,
    raw: RawQuery,
    schema: &'static [FieldSpec],
}

impl QueryBuilder {
    #[must_use]
    pub fn new(descriptor: QueryDescriptor, raw: RawQuery) -> Self {
        Self { descriptor, raw, schema: &[] }
    }

    /// Field types used to cast filter values; undeclared fields are inferred.
    #[must_use]
    pub fn with_schema(mut self, schema: &'static [FieldSpec]) -> Self {
        self.schema = schema;
        self
    }

    fn field_criteria(&self, field: &str, op: Option<&str>, values: &[String]) -> Result<Filter, DbError> {
        let kind = kind_of(self.schema, field);
        let cast = |v: &str| cast_value(field, v, kind);
        match op {
            None => match values {
                [one] => Ok(Filter::Cmp { path: field.to_string(), op: CmpOp::Eq, value: cast(one.as_str())? }),
                many => Ok(Filter::In {
                    path: field.to_string(),
                    values: many.iter().take(MAX_IN_SET).map(|v| cast(v.as_str())).collect::<Result<_, _>>()?,
                }),
            },
            Some("in") => {
                let values: Vec<Bson> = values
                    .iter()
                    .flat_map(|v| v.split(','))
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .take(MAX_IN_SET)
                    .map(cast)
                    .collect::<Result<_, _>>()?;
                Ok(Filter::In { path: field.to_string(), values })
            }
            Some(name) => {
                let cmp = comparison(name).ok_or_else(|| {
                    DbError::MalformedQuery(format!("unknown operator '{name}' on '{field}'"))
                })?;
                let each = values
                    .iter()
                    .map(|v| -> Result<Filter, DbError> {
                        Ok(Filter::Cmp { path: field.to_string(), op: cmp, value: cast(v.as_str())? })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(and_all(each))
            }
        }
    }

    /// Narrows by every non-reserved parameter: `field=v` is equality, `field[op]=v`
    /// applies `gt`, `gte`, `lt`, `lte` or `in` (comma separated).
    ///
    /// # Errors
    /// Returns `MalformedQuery` for an unknown or malformed operator, or a value that
    /// does not fit the field's declared type. The descriptor is left untouched.
    pub fn filter(&mut self) -> Result<&mut Self, DbError> {
        let mut parts = Vec::new();
        for (key, value) in self.raw.iter().filter(|(k, _)| !is_reserved(k)) {
            let (field, op) = split_key(key)?;
            if is_reserved(field) {
                continue;
            }
            parts.push(self.field_criteria(field, op, value.as_slice())?);
        }
        let criteria = and_all(parts);
        if criteria != Filter::True {
            self.descriptor.narrow(criteria);
        }
        Ok(self)
    }

    /// `sort=title,-salary` orders by title ascending, then salary descending.
    /// Without it, newest `postingDate` first.
    pub fn sort(&mut self) -> &mut Self {
        let mut specs = self.raw.get_str("sort").map(parse_sort).unwrap_or_default();
        if specs.is_empty() {
            specs.push(SortSpec::desc(DEFAULT_SORT_FIELD));
        }
        self.descriptor.order_by(specs);
        self
    }

    /// `fields=title,salary` returns only those fields; `-`-prefixed names hide fields
    /// instead. Without it, everything but the version field.
    pub fn limit_fields(&mut self) -> &mut Self {
        let tokens: Vec<&str> = self.raw.get_str("fields").map(|f| split_list(f).collect()).unwrap_or_default();
        let (hidden, shown): (Vec<&str>, Vec<&str>) = tokens.into_iter().partition(|t| t.starts_with('-'));
        let projection = if shown.is_empty() {
            let mut exclude: Vec<String> =
                hidden.iter().map(|t| t.trim_start_matches('-')).filter(|t| !t.is_empty()).map(String::from).collect();
            exclude.push(VERSION_FIELD.to_string());
            Projection::Exclude(exclude)
        } else {
            Projection::Include(shown.into_iter().map(String::from).collect())
        };
        self.descriptor.project(projection);
        self
    }

    /// `keyword=...` keeps records whose text-indexed fields contain any of the words.
    pub fn search_by_query(&mut self) -> &mut Self {
        if let Some(keyword) = self.raw.get_str("keyword").map(str::trim).filter(|k| !k.is_empty()) {
            let fields = self.descriptor.collection().text_index_fields();
            let search = keyword.to_string();
            self.descriptor.narrow(Filter::Text { fields, search });
        }
        self
    }

    /// Pages of `results_per_page` records; `page` defaults to 1 when missing or not a
    /// positive integer. The `limit` parameter is not consulted.
    pub fn pagination(&mut self, results_per_page: usize) -> &mut Self {
        let per_page = results_per_page.max(1);
        let page = self
            .raw
            .get_str("page")
            .and_then(|p| p.trim().parse::<i64>().ok())
            .and_then(crate::utils::num::i64_to_usize)
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        self.descriptor.skip(crate::utils::num::page_offset(page, per_page)).take(per_page);
        self
    }

    #[must_use]
    pub const fn descriptor(&self) -> &QueryDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn into_descriptor(self) -> QueryDescriptor {
        self.descriptor
    }

    /// # Errors
    /// Propagates storage errors unchanged.
    pub fn execute(self) -> Result<Vec<Document>, DbError> {
        self.descriptor.execute()
    }
}
