use crate::integration_tests::support::{seeded, titles};
use jobboard::errors::DbError;

#[test]
fn radius_search_around_boston() {
    let (s, _) = seeded(10);
    assert_eq!(titles(&s.search_in_radius("02108", 0.5).unwrap()), vec!["Rust Backend Engineer"]);
    let near = s.search_in_radius("02108", 5.0).unwrap();
    assert_eq!(titles(&near), vec!["Rust Backend Engineer", "Node Developer", "Rust Intern"]);
    assert!(near.iter().all(|j| !j.data.contains_key("__v")));
    assert_eq!(s.search_in_radius("02108", 250.0).unwrap().len(), 5);
}

#[test]
fn radius_search_needs_a_known_zipcode() {
    let (s, _) = seeded(10);
    assert!(matches!(s.search_in_radius("99999", 10.0), Err(DbError::Geocode(_))));
}

#[test]
fn stats_group_matches_by_experience() {
    let (s, _) = seeded(10);
    let stats = s.job_stats("rust").unwrap();
    assert_eq!(stats.iter().map(|g| g.id.as_str()).collect::<Vec<_>>(), vec!["5 YEARS+", "NO EXPERIENCE"]);
    let senior = &stats[0];
    assert_eq!(senior.total_jobs, 1);
    assert_eq!(senior.avg_salary, 120_000.0);
    assert_eq!(senior.avg_position, 2.0);

    let all_entry = s.job_stats("intern teller").unwrap();
    assert_eq!(all_entry.len(), 1);
    let g = &all_entry[0];
    assert_eq!(g.id, "NO EXPERIENCE");
    assert_eq!(g.total_jobs, 2);
    assert_eq!((g.min_salary, g.max_salary), (30_000.0, 40_000.0));
    assert_eq!(g.avg_salary, 35_000.0);
    assert_eq!(g.avg_position, 2.0);
}

#[test]
fn stats_for_unknown_topic_are_empty() {
    let (s, _) = seeded(10);
    assert!(s.job_stats("astronaut").unwrap().is_empty());
}
