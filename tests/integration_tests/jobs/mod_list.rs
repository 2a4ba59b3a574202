use crate::integration_tests::support::{seeded, titles};
use jobboard::errors::DbError;
use jobboard::query::RawQuery;

fn list(qs: &str, page_size: usize) -> Result<Vec<String>, DbError> {
    let (s, _) = seeded(page_size);
    s.list_jobs(&RawQuery::parse(qs)).map(|r| titles(&r))
}

#[test]
fn empty_query_is_newest_first_without_version() {
    let (s, _) = seeded(10);
    let jobs = s.list_jobs(&RawQuery::new()).unwrap();
    assert_eq!(titles(&jobs), vec!["Data Analyst", "Rust Intern", "Bank Teller", "Node Developer", "Rust Backend Engineer"]);
    assert!(jobs.iter().all(|j| !j.data.contains_key("__v")));
}

#[test]
fn range_filter_on_salary() {
    assert_eq!(list("salary[gte]=75000", 10).unwrap(), vec!["Data Analyst", "Node Developer", "Rust Backend Engineer"]);
    assert_eq!(list("salary[gt]=30000&salary[lt]=90000", 10).unwrap(), vec!["Data Analyst", "Bank Teller"]);
}

#[test]
fn worked_example_pages_through_matches() {
    assert_eq!(list("?experience=5+Years%2B&salary[gte]=80000&sort=-postingDate&page=1", 10).unwrap(), vec![
        "Rust Backend Engineer"
    ]);
    assert!(list("?experience=5+Years%2B&salary[gte]=80000&sort=-postingDate&page=2", 10).unwrap().is_empty());
}

#[test]
fn pages_are_disjoint_and_ordered() {
    assert_eq!(list("jobType=Permanent&page=1", 2).unwrap(), vec!["Data Analyst", "Node Developer"]);
    assert_eq!(list("jobType=Permanent&page=2", 2).unwrap(), vec!["Rust Backend Engineer"]);
    assert_eq!(list("jobType=Permanent&page=bogus", 2).unwrap(), vec!["Data Analyst", "Node Developer"]);
}

#[test]
fn limit_parameter_does_not_change_page_size() {
    assert_eq!(list("limit=1", 10).unwrap().len(), 5);
}

#[test]
fn set_membership_matches_array_fields() {
    assert_eq!(list("industry[in]=Banking,Business", 10).unwrap(), vec!["Data Analyst", "Bank Teller"]);
    assert_eq!(list("jobType=Internship&jobType=Temporary", 10).unwrap(), vec!["Rust Intern", "Bank Teller"]);
    assert_eq!(list("industry=Information Technology", 10).unwrap().len(), 3);
}

#[test]
fn sort_by_several_keys() {
    assert_eq!(list("sort=salary", 10).unwrap(), vec![
        "Rust Intern",
        "Bank Teller",
        "Data Analyst",
        "Node Developer",
        "Rust Backend Engineer"
    ]);
    assert_eq!(list("sort=experience,-salary", 10).unwrap(), vec![
        "Data Analyst",
        "Node Developer",
        "Rust Backend Engineer",
        "Bank Teller",
        "Rust Intern"
    ]);
}

#[test]
fn fields_projection_limits_output() {
    let (s, _) = seeded(10);
    let jobs = s.list_jobs(&RawQuery::parse("fields=title,salary")).unwrap();
    for j in &jobs {
        assert_eq!(j.data.keys().map(String::as_str).collect::<Vec<_>>(), vec!["title", "salary"]);
        let json = j.to_json();
        assert!(json.get("_id").is_some());
        assert!(json.get("description").is_none());
    }
    let hidden = s.list_jobs(&RawQuery::parse("fields=-description,-location")).unwrap();
    assert!(hidden.iter().all(|j| !j.data.contains_key("description") && !j.data.contains_key("location")));
    assert!(hidden.iter().all(|j| j.data.contains_key("title")));
    let with_version = s.list_jobs(&RawQuery::parse("fields=title,__v")).unwrap();
    assert!(with_version.iter().all(|j| j.data.get_i64("__v").ok() == Some(0)));
}

#[test]
fn keyword_searches_title_and_description() {
    assert_eq!(list("keyword=rust", 10).unwrap(), vec!["Rust Intern", "Rust Backend Engineer"]);
    assert_eq!(list("keyword=rust+-intern", 10).unwrap(), vec!["Rust Backend Engineer"]);
    assert_eq!(list("keyword=sql+react", 10).unwrap(), vec!["Data Analyst", "Node Developer"]);
    assert!(list("keyword=cobol", 10).unwrap().is_empty());
}

#[test]
fn nested_and_date_fields_are_typed() {
    assert_eq!(list("location.city=Cambridge", 10).unwrap(), vec!["Rust Intern", "Node Developer"]);
    assert_eq!(list("location.zipcode=02108", 10).unwrap(), vec!["Rust Backend Engineer"]);
    assert_eq!(list("postingDate[gte]=2024-03-04", 10).unwrap(), vec!["Data Analyst", "Rust Intern"]);
    assert_eq!(list("positions[gte]=2", 10).unwrap(), vec!["Bank Teller", "Rust Backend Engineer"]);
}

#[test]
fn malformed_parameters_are_rejected() {
    for qs in ["salary[foo]=1", "salary[gte]=lots", "postingDate[lt]=soon", "salary[gte=1"] {
        assert!(matches!(list(qs, 10), Err(DbError::MalformedQuery(_))), "{qs}");
    }
}

#[test]
fn unknown_fields_simply_match_nothing() {
    assert!(list("color=blue", 10).unwrap().is_empty());
}
