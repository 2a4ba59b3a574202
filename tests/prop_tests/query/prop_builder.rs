use jobboard::collection::Collection;
use jobboard::errors::DbError;
use jobboard::query::{CmpOp, Filter, QueryBuilder, QueryDescriptor, RESERVED_KEYS, RawQuery, is_reserved};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

fn builder(raw: RawQuery) -> QueryBuilder {
    QueryBuilder::new(QueryDescriptor::find(Arc::new(Collection::new("jobs".into(), None))), raw)
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_.]{0,12}".prop_filter("reserved", |s| !is_reserved(s))
}

fn leaves(f: &Filter) -> Vec<&Filter> {
    match f {
        Filter::And(fs) => fs.iter().flat_map(leaves).collect(),
        Filter::True => vec![],
        other => vec![other],
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn every_plain_parameter_becomes_one_criterion(
        params in proptest::collection::btree_map(field_name(), "[A-Za-z0-9 ]{0,10}", 0..8)
    ) {
        let raw: RawQuery = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let mut qb = builder(raw);
        qb.filter().unwrap();
        let paths: Vec<&str> = qb.descriptor().filter().paths();
        let expected: Vec<&str> = params.keys().map(String::as_str).collect();
        prop_assert_eq!(paths, expected);
        for leaf in leaves(qb.descriptor().filter()) {
            let is_eq = matches!(leaf, Filter::Cmp { op: CmpOp::Eq, .. });
            prop_assert!(is_eq);
        }
    }

    #[test]
    fn comparison_suffixes_never_become_equality(
        field in field_name(),
        ops in proptest::sample::subsequence(vec!["gt", "gte", "lt", "lte"], 1..=4),
        n in any::<i32>()
    ) {
        let raw: RawQuery = ops.iter().map(|op| (format!("{field}[{op}]"), n.to_string())).collect();
        let mut qb = builder(raw);
        qb.filter().unwrap();
        let leaves = leaves(qb.descriptor().filter());
        prop_assert_eq!(leaves.len(), ops.len());
        for leaf in leaves {
            let is_range = matches!(leaf, Filter::Cmp { op, path, .. } if *op != CmpOp::Eq && path == &field);
            prop_assert!(is_range);
        }
    }

    #[test]
    fn reserved_parameters_never_filter(
        picks in proptest::sample::subsequence(RESERVED_KEYS.to_vec(), 0..=5),
        suffix in proptest::option::of(prop_oneof![Just("gt"), Just("in"), Just("lte")]),
        value in "[a-z0-9,]{0,8}"
    ) {
        let raw: RawQuery = picks
            .iter()
            .map(|k| (suffix.map_or_else(|| (*k).to_string(), |s| format!("{k}[{s}]")), value.clone()))
            .collect();
        let mut qb = builder(raw);
        qb.filter().unwrap();
        prop_assert_eq!(qb.descriptor().filter(), &Filter::True);
    }

    #[test]
    fn pagination_skips_whole_pages(page in 1usize..10_000, per_page in 1usize..500) {
        let mut qb = builder(RawQuery::parse(&format!("page={page}")));
        qb.pagination(per_page);
        prop_assert_eq!(qb.descriptor().options().skip, Some((page - 1) * per_page));
        prop_assert_eq!(qb.descriptor().options().limit, Some(per_page));
    }

    #[test]
    fn arbitrary_query_strings_never_panic(qs in ".{0,64}") {
        let mut qb = builder(RawQuery::parse(&qs));
        match qb.filter() {
            Ok(_) | Err(DbError::MalformedQuery(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
        qb.sort().limit_fields().search_by_query().pagination(10);
        let sort_fields = qb.descriptor().options().sort.as_ref().map_or(0, Vec::len);
        prop_assert!(sort_fields >= 1);
    }
}

#[test]
fn field_names_round_trip_through_query_strings() {
    let mut expect = BTreeMap::new();
    expect.insert("location.city", "Boston");
    expect.insert("salary", "1000");
    let raw = RawQuery::parse("location.city=Boston&salary=1000");
    let got: BTreeMap<&str, &str> = raw.iter().map(|(k, v)| (k, v.first())).collect();
    assert_eq!(got, expect);
}
