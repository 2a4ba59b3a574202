use crate::integration_tests::support::{POSTINGS, draft, seeded, service};
use jobboard::errors::DbError;
use jobboard::query::RawQuery;
use serde_json::json;

#[test]
fn get_by_id_and_slug() {
    let (s, records) = seeded(10);
    let first = &records[0];
    let id = first.id.to_string();
    let got = s.get_job(&id, "rust-backend-engineer").unwrap();
    assert_eq!(got.data.get_str("title").unwrap(), "Rust Backend Engineer");
    assert!(matches!(s.get_job(&id, "node-developer"), Err(DbError::NoSuchDocument(_))));
}

#[test]
fn update_merges_and_revalidates() {
    let (s, records) = seeded(10);
    let id = records[1].id.to_string();
    let updated = s.update_job(&id, &json!({"salary": 95000, "positions": 4})).unwrap();
    assert_eq!(updated.data.get_str("title").unwrap(), "Node Developer");
    assert_eq!(updated.data.get_i64("positions").unwrap(), 4);
    let listed = s.list_jobs(&RawQuery::parse("salary=95000")).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, records[1].id);

    let err = s.update_job(&id, &json!({"email": "nope"})).unwrap_err();
    assert!(matches!(err, DbError::Validation(ref m) if m.starts_with("email")));
    assert_eq!(s.get_job(&id, "node-developer").unwrap().data.get_str("email").unwrap(), "jobs@example.com");
}

#[test]
fn update_with_non_object_patch_is_a_client_error() {
    let (s, records) = seeded(10);
    let id = records[0].id.to_string();
    for patch in [json!([1, 2]), json!("salary"), json!(null)] {
        let err = s.update_job(&id, &patch).unwrap_err();
        assert!(matches!(err, DbError::Validation(ref m) if m.starts_with("patch")), "{patch}: {err}");
        assert!(err.is_client_error());
    }
}

#[test]
fn update_rejects_a_location_that_is_not_a_point() {
    let (s, records) = seeded(10);
    let id = records[0].id.to_string();
    for bad in [
        json!({"location": "nowhere"}),
        json!({"location": null}),
        json!({"location": {"type": "Point", "coordinates": ["x", 1.0]}}),
        json!({"location": {"type": "Polygon", "coordinates": [-71.06, 42.36]}}),
    ] {
        let err = s.update_job(&id, &bad).unwrap_err();
        assert!(matches!(err, DbError::Validation(ref m) if m.starts_with("location")), "{bad}: {err}");
    }
    let near = s.search_in_radius("02108", 0.5).unwrap();
    assert_eq!(near.len(), 1);
    assert_eq!(near[0].id, records[0].id);
}

#[test]
fn update_with_a_point_moves_the_job() {
    let (s, records) = seeded(10);
    let id = records[0].id.to_string();
    let moved = json!({"location": {"type": "Point", "coordinates": [-74.0113, 40.7075], "city": "New York"}});
    s.update_job(&id, &moved).unwrap();
    assert!(s.search_in_radius("02108", 0.5).unwrap().is_empty());
    let ny: Vec<_> = s.search_in_radius("10004", 0.5).unwrap().into_iter().map(|r| r.id).collect();
    assert!(ny.contains(&records[0].id));
}

#[test]
fn delete_removes_from_listing() {
    let (s, records) = seeded(10);
    s.delete_job(&records[2].id.to_string()).unwrap();
    assert_eq!(s.list_jobs(&RawQuery::new()).unwrap().len(), 4);
    assert!(matches!(s.delete_job(&records[2].id.to_string()), Err(DbError::NoSuchDocument(_))));
}

#[test]
fn create_rejects_invalid_postings_before_storing() {
    let s = service(10);
    let mut d = draft(&POSTINGS[0]);
    d.salary = None;
    assert!(matches!(s.create_job(d), Err(DbError::Validation(_))));
    let mut d = draft(&POSTINGS[0]);
    d.industry = vec!["Mining".into()];
    assert!(matches!(s.create_job(d), Err(DbError::Validation(_))));
    assert!(s.collection().is_empty());
}
