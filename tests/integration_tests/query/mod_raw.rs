use jobboard::query::{RESERVED_KEYS, RawQuery, RawValue, is_reserved};

#[test]
fn reserved_keys_are_exactly_the_five_controls() {
    assert_eq!(RESERVED_KEYS, ["sort", "fields", "keyword", "page", "limit"]);
    assert!(is_reserved("page"));
    assert!(!is_reserved("pages"));
}

#[test]
fn parse_keeps_bracketed_keys_whole() {
    let q = RawQuery::parse("salary%5Bgte%5D=1&salary[lte]=2&industry[in]=A,B");
    assert_eq!(q.get_str("salary[gte]"), Some("1"));
    assert_eq!(q.get_str("salary[lte]"), Some("2"));
    assert_eq!(q.get("industry[in]"), Some(&RawValue::One("A,B".into())));
}

#[test]
fn collected_pairs_repeat_like_a_query_string() {
    let a: RawQuery = [("t", "1"), ("t", "2")].into_iter().collect();
    assert_eq!(a, RawQuery::parse("t=1&t=2"));
    assert_eq!(a.get("t").map(RawValue::as_slice), Some(&["1".to_string(), "2".to_string()][..]));
}
