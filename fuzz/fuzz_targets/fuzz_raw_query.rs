#![no_main]
use jobboard::collection::Collection;
use jobboard::jobs::JOB_SCHEMA;
use jobboard::query::{QueryBuilder, QueryDescriptor, RawQuery};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        // Parsing and every builder stage must not panic on any query string
        let col = Arc::new(Collection::new("jobs".into(), None));
        let mut qb = QueryBuilder::new(QueryDescriptor::find(col), RawQuery::parse(s)).with_schema(&JOB_SCHEMA);
        if qb.filter().is_ok() {
            qb.sort().limit_fields().search_by_query().pagination(10);
        }
    }
});
