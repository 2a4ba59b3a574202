#![no_main]
use jobboard::collection::Collection;
use jobboard::query::{QueryBuilder, QueryDescriptor, RawQuery, eval_filter};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        let col = Arc::new(Collection::new("jobs".into(), None));
        let mut qb = QueryBuilder::new(QueryDescriptor::find(col), RawQuery::parse(s));
        if qb.filter().is_err() {
            return;
        }
        // A few shapes to exercise array, nested and date paths
        let docs = [
            bson::doc! {"salary": 80000, "title": "x", "industry": ["Banking", "Others"]},
            bson::doc! {"salary": 1.5, "location": {"city": "Boston", "coordinates": [-71.0, 42.3]}},
            bson::doc! {"postingDate": bson::DateTime::from_millis(0), "positions": 2_i64},
        ];
        for d in &docs {
            let _ = eval_filter(d, qb.descriptor().filter());
        }
    }
});
