use crate::integration_tests::support::{POSTINGS, draft, geocoder};
use jobboard::config::AppConfig;
use jobboard::engine::Engine;
use jobboard::jobs::{JOBS_COLLECTION, JobService};
use jobboard::query::RawQuery;
use serde_json::json;
use tempfile::tempdir;

fn open(path: &std::path::Path) -> JobService {
    let engine = Engine::open(path).unwrap();
    JobService::new(&engine, Box::new(geocoder()), 10).unwrap()
}

#[test]
fn jobs_survive_reopen() {
    let dir = tempdir().unwrap();
    let wal = dir.path().join("data").join("jobs.wal");
    let (kept, gone) = {
        let s = open(&wal);
        let a = s.create_job(draft(&POSTINGS[0])).unwrap();
        let b = s.create_job(draft(&POSTINGS[1])).unwrap();
        s.update_job(&a.id.to_string(), &json!({"salary": 125000})).unwrap();
        s.delete_job(&b.id.to_string()).unwrap();
        (a, b)
    };

    let s = open(&wal);
    let jobs = s.list_jobs(&RawQuery::new()).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, kept.id);
    assert_eq!(jobs[0].data.get_i64("salary").unwrap(), 125_000);
    assert!(matches!(jobs[0].data.get("postingDate"), Some(bson::Bson::DateTime(_))));
    assert!(s.get_job(&gone.id.to_string(), "node-developer").is_err());
    assert_eq!(s.collection().text_index_fields(), vec!["title", "description"]);
    assert_eq!(s.job_stats("rust").unwrap().len(), 1);
}

#[test]
fn reopening_does_not_duplicate_the_text_index_record() {
    let dir = tempdir().unwrap();
    let wal = dir.path().join("jobs.wal");
    drop(open(&wal));
    let size_after_first = std::fs::metadata(&wal).unwrap().len();
    drop(open(&wal));
    assert_eq!(std::fs::metadata(&wal).unwrap().len(), size_after_first);
    let engine = Engine::open(&wal).unwrap();
    assert_eq!(engine.list_collection_names(), vec![JOBS_COLLECTION]);
}

#[test]
fn library_open_uses_configured_path_and_page_size() {
    let dir = tempdir().unwrap();
    let cfg = AppConfig::from_toml_str(&format!(
        "db_path = {:?}\npage_size = 2\n\n[[geocoder.places]]\nquery = \"1 Beacon St, Boston\"\nlatitude = 42.3588\nlongitude = -71.0638\n",
        dir.path().join("lib.wal").display().to_string()
    ))
    .unwrap();
    let s = jobboard::open(&cfg).unwrap();
    assert_eq!(s.page_size(), 2);
    for _ in 0..3 {
        s.create_job(draft(&POSTINGS[0])).unwrap();
    }
    assert_eq!(s.list_jobs(&RawQuery::new()).unwrap().len(), 2);
    assert!(dir.path().join("lib.wal").exists());
}
