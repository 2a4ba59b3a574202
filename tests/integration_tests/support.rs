// Shared fixtures: a fixed geocoder and a handful of postings spread over three cities.
use jobboard::engine::Engine;
use jobboard::jobs::{GeoPlace, JobRecord, JobService, NewJob, StaticGeocoder};
use serde_json::json;

fn place(lat: f64, lng: f64, city: &str, state: &str, zip: &str) -> GeoPlace {
    GeoPlace {
        latitude: lat,
        longitude: lng,
        formatted_address: format!("{city}, {state} {zip}"),
        city: city.into(),
        state: state.into(),
        zipcode: zip.into(),
        country: "US".into(),
    }
}

pub fn geocoder() -> StaticGeocoder {
    StaticGeocoder::new()
        .with_place("1 Beacon St, Boston", place(42.3588, -71.0638, "Boston", "MA", "02108"))
        .with_place("2 Kendall Sq, Cambridge", place(42.3656, -71.0860, "Cambridge", "MA", "02142"))
        .with_place("3 Broadway, New York", place(40.7075, -74.0113, "New York", "NY", "10004"))
        .with_place("02108", place(42.3588, -71.0638, "Boston", "MA", "02108"))
        .with_place("10004", place(40.7075, -74.0113, "New York", "NY", "10004"))
}

pub fn service(page_size: usize) -> JobService {
    JobService::new(&Engine::in_memory(), Box::new(geocoder()), page_size).unwrap()
}

pub struct Posting {
    pub title: &'static str,
    pub description: &'static str,
    pub address: &'static str,
    pub industry: &'static str,
    pub job_type: &'static str,
    pub experience: &'static str,
    pub salary: i64,
    pub positions: i64,
    pub day: u32,
}

pub const POSTINGS: [Posting; 5] = [
    Posting {
        title: "Rust Backend Engineer",
        description: "Build Rust services",
        address: "1 Beacon St, Boston",
        industry: "Information Technology",
        job_type: "Permanent",
        experience: "5 Years+",
        salary: 120_000,
        positions: 2,
        day: 1,
    },
    Posting {
        title: "Node Developer",
        description: "Node and React front to back",
        address: "2 Kendall Sq, Cambridge",
        industry: "Information Technology",
        job_type: "Permanent",
        experience: "2 Year - 5 Years",
        salary: 90_000,
        positions: 1,
        day: 2,
    },
    Posting {
        title: "Bank Teller",
        description: "Customer service at the branch",
        address: "3 Broadway, New York",
        industry: "Banking",
        job_type: "Temporary",
        experience: "No Experience",
        salary: 40_000,
        positions: 3,
        day: 3,
    },
    Posting {
        title: "Rust Intern",
        description: "Learn Rust and systems programming",
        address: "2 Kendall Sq, Cambridge",
        industry: "Information Technology",
        job_type: "Internship",
        experience: "No Experience",
        salary: 30_000,
        positions: 1,
        day: 4,
    },
    Posting {
        title: "Data Analyst",
        description: "SQL reporting for the business",
        address: "3 Broadway, New York",
        industry: "Business",
        job_type: "Permanent",
        experience: "1 Year - 2 Years",
        salary: 75_000,
        positions: 1,
        day: 5,
    },
];

pub fn draft(p: &Posting) -> NewJob {
    serde_json::from_value(json!({
        "title": p.title,
        "description": p.description,
        "email": "jobs@example.com",
        "address": p.address,
        "company": "Example Corp",
        "industry": [p.industry],
        "jobType": p.job_type,
        "minEducation": "Bachelors",
        "positions": p.positions,
        "experience": p.experience,
        "salary": p.salary,
        "postingDate": format!("2024-03-{:02}T00:00:00Z", p.day),
    }))
    .unwrap()
}

/// A service holding every posting in [`POSTINGS`], created in order.
pub fn seeded(page_size: usize) -> (JobService, Vec<JobRecord>) {
    let s = service(page_size);
    let records = POSTINGS.iter().map(|p| s.create_job(draft(p)).unwrap()).collect();
    (s, records)
}

pub fn titles(records: &[JobRecord]) -> Vec<String> {
    records.iter().map(|r| r.data.get_str("title").unwrap_or_default().to_string()).collect()
}
