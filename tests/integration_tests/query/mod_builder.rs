use bson::{Bson, doc};
use jobboard::collection::Collection;
use jobboard::document::Document;
use jobboard::errors::DbError;
use jobboard::query::{CmpOp, Filter, Projection, QueryBuilder, QueryDescriptor, RawQuery, SortSpec};
use std::sync::Arc;

fn products() -> Arc<Collection> {
    let col = Arc::new(Collection::new("products".into(), None));
    for (name, price, tags, day) in [
        ("lamp", 25, vec!["home", "light"], 3_i64),
        ("desk", 180, vec!["home", "office"], 1),
        ("pen", 2, vec!["office"], 2),
    ] {
        col.insert_document(Document::new(doc! {
            "name": name,
            "price": price,
            "tags": tags,
            "postingDate": bson::DateTime::from_millis(day * 86_400_000),
            "__v": 0,
        }))
        .unwrap();
    }
    col
}

fn names(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.data.get_str("name").unwrap_or_default()).collect()
}

#[test]
fn builder_without_schema_infers_numbers() {
    let mut qb = QueryBuilder::new(QueryDescriptor::find(products()), RawQuery::parse("price[lte]=25"));
    qb.filter().unwrap().sort();
    assert_eq!(
        qb.descriptor().filter(),
        &Filter::Cmp { path: "price".into(), op: CmpOp::Lte, value: Bson::Int64(25) }
    );
    let docs = qb.execute().unwrap();
    assert_eq!(names(&docs), vec!["lamp", "pen"]);
}

#[test]
fn stages_compose_in_any_subset() {
    let raw = RawQuery::parse("tags=office&sort=price&fields=name&page=1");
    let mut only_sort = QueryBuilder::new(QueryDescriptor::find(products()), raw.clone());
    only_sort.sort();
    assert_eq!(only_sort.descriptor().filter(), &Filter::True);
    assert_eq!(only_sort.descriptor().options().sort, Some(vec![SortSpec::asc("price")]));
    assert_eq!(only_sort.descriptor().options().projection, None);

    let mut full = QueryBuilder::new(QueryDescriptor::find(products()), raw);
    full.filter().unwrap().sort().limit_fields().pagination(10);
    let docs = full.execute().unwrap();
    assert_eq!(names(&docs), vec!["pen", "desk"]);
    assert!(docs.iter().all(|d| d.data.keys().count() == 1));
}

#[test]
fn fields_without_a_value_hide_only_the_version() {
    let mut qb = QueryBuilder::new(QueryDescriptor::find(products()), RawQuery::parse("fields="));
    qb.limit_fields();
    assert_eq!(qb.descriptor().options().projection, Some(Projection::Exclude(vec!["__v".into()])));
    let docs = qb.execute().unwrap();
    assert!(docs.iter().all(|d| !d.data.contains_key("__v") && d.data.contains_key("price")));
}

#[test]
fn keyword_without_text_index_fails_at_execution() {
    let mut qb = QueryBuilder::new(QueryDescriptor::find(products()), RawQuery::parse("keyword=lamp"));
    qb.search_by_query();
    assert!(matches!(qb.execute(), Err(DbError::QueryError(_))));
}

#[test]
fn pagination_walks_the_default_order() {
    let col = products();
    let page = |n: usize| {
        let mut qb = QueryBuilder::new(QueryDescriptor::find(Arc::clone(&col)), RawQuery::parse(&format!("page={n}")));
        qb.sort().pagination(2);
        names(&qb.execute().unwrap()).into_iter().map(String::from).collect::<Vec<_>>()
    };
    assert_eq!(page(1), vec!["lamp", "pen"]);
    assert_eq!(page(2), vec!["desk"]);
    assert!(page(3).is_empty());
}
