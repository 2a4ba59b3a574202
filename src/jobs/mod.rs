//! Job postings: the validated model, geocoding, and the service that answers
//! list, lookup, radius and stats requests.

mod geocoder;
mod model;
mod service;
mod stats;

pub use geocoder::{GeoPlace, Geocoder, StaticGeocoder};
pub use model::{
    DEFAULT_OPEN_DAYS, Education, Experience, Industry, JOB_SCHEMA, Job, JobType, Location, NewJob,
    TITLE_MAX_CHARS, is_valid_email, slugify,
};
pub use service::{JOBS_COLLECTION, JobRecord, JobService, TEXT_FIELDS};
pub use stats::{TopicStats, group_by_experience};
