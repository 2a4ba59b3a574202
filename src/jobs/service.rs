use crate::collection::Collection;
use crate::document::Document;
use crate::engine::Engine;
use crate::errors::DbError;
use crate::query::geo::miles_to_radians;
use crate::query::{Filter, Projection, QueryBuilder, QueryDescriptor, RawQuery, VERSION_FIELD};
use crate::types::DocumentId;
use crate::utils::json::{document_to_json_map, json_value_to_bson_document};
use bson::{Bson, Document as BsonDocument};
use chrono::Utc;
use log::{debug, info};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

use super::geocoder::Geocoder;
use super::model::{JOB_SCHEMA, Location, NewJob};
use super::stats::{TopicStats, group_by_experience};

pub const JOBS_COLLECTION: &str = "jobs";
/// Fields searched by `keyword=` and topic stats.
pub const TEXT_FIELDS: [&str; 2] = ["title", "description"];

/// A stored job as callers see it: its id plus the (possibly projected) fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: DocumentId,
    pub data: BsonDocument,
}

impl JobRecord {
    /// JSON object with `_id` first; dates as RFC 3339 strings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("_id".into(), Value::String(self.id.to_string()));
        out.extend(document_to_json_map(&self.data));
        Value::Object(out)
    }

    fn without_version(mut self) -> Self {
        self.data.remove(VERSION_FIELD);
        self
    }
}

impl From<Document> for JobRecord {
    fn from(d: Document) -> Self {
        Self { id: d.id, data: d.data }
    }
}

impl Serialize for JobRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Job postings over the embedded store.
pub struct JobService {
    jobs: Arc<Collection>,
    geocoder: Box<dyn Geocoder>,
    page_size: usize,
}

impl JobService {
    /// Opens (creating if needed) the jobs collection and its text index.
    ///
    /// # Errors
    /// Propagates storage errors from creating the collection or index.
    pub fn new(engine: &Engine, geocoder: Box<dyn Geocoder>, page_size: usize) -> Result<Self, DbError> {
        let jobs = engine.create_collection(JOBS_COLLECTION)?;
        if jobs.text_index_fields().is_empty() {
            jobs.create_text_index(&TEXT_FIELDS)?;
        }
        Ok(Self { jobs, geocoder, page_size: page_size.max(1) })
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn collection(&self) -> &Arc<Collection> {
        &self.jobs
    }

    /// Validates, slugs and geocodes a posting, then stores it.
    ///
    /// # Errors
    /// `Validation` for bad fields, `Geocode` for an unknown address, storage errors otherwise.
    pub fn create_job(&self, draft: NewJob) -> Result<JobRecord, DbError> {
        let mut job = draft.validate(Utc::now())?;
        job.location = Some(Location::from(self.geocoder.geocode(&job.address)?));
        let document = Document::new(job.to_document(0));
        let record = JobRecord::from(document.clone()).without_version();
        let id = self.jobs.insert_document(document)?;
        info!("job {id} created (slug '{}')", job.slug);
        Ok(record)
    }

    /// One page of jobs narrowed by the request parameters.
    ///
    /// # Errors
    /// `MalformedQuery` for bad parameters, `QueryError` if the text index is missing.
    pub fn list_jobs(&self, raw: &RawQuery) -> Result<Vec<JobRecord>, DbError> {
        let mut qb = QueryBuilder::new(QueryDescriptor::find(Arc::clone(&self.jobs)), raw.clone())
            .with_schema(&JOB_SCHEMA);
        qb.filter()?.sort().limit_fields().search_by_query().pagination(self.page_size);
        debug!(
            "list_jobs filter={:?} options={:?}",
            qb.descriptor().filter(),
            qb.descriptor().options()
        );
        Ok(qb.execute()?.into_iter().map(JobRecord::from).collect())
    }

    /// The job with this id, provided its slug also matches.
    ///
    /// # Errors
    /// `InvalidDocumentId` for a malformed id, `NoSuchDocument` otherwise.
    pub fn get_job(&self, id: &str, slug: &str) -> Result<JobRecord, DbError> {
        let doc_id = DocumentId::from_str(id)?;
        self.jobs
            .find_document(&doc_id)
            .filter(|d| d.data.get_str("slug").is_ok_and(|s| s == slug))
            .map(|d| JobRecord::from(d).without_version())
            .ok_or_else(|| DbError::NoSuchDocument(id.to_string()))
    }

    /// Overwrites the top-level fields named in `patch` and re-validates the result.
    /// Slug and location keep their stored values unless the patch sets them.
    ///
    /// # Errors
    /// `NoSuchDocument`, or `Validation` for a patch that is not an object, fails the
    /// job validators, or carries a `location` that is not a GeoJSON point.
    pub fn update_job(&self, id: &str, patch: &Value) -> Result<JobRecord, DbError> {
        let doc_id = DocumentId::from_str(id)?;
        if !patch.is_object() {
            return Err(DbError::Validation("patch: expected a JSON object of job fields".into()));
        }
        let patch = json_value_to_bson_document(patch).map_err(|e| DbError::Validation(format!("patch: {e}")))?;
        if let Some(loc) = patch.get("location")
            && Location::from_bson(loc).is_none()
        {
            return Err(DbError::Validation(
                "location: expected a GeoJSON Point with [longitude, latitude] coordinates".into(),
            ));
        }
        let stored = self.jobs.find_document(&doc_id).ok_or_else(|| DbError::NoSuchDocument(id.to_string()))?;
        let mut merged = stored.data.clone();
        for (k, v) in patch {
            merged.insert(k, v);
        }
        let draft: NewJob = serde_json::from_value(Value::Object(document_to_json_map(&merged)))?;
        let mut job = draft.validate(Utc::now())?;
        if let Ok(slug) = merged.get_str("slug") {
            job.slug = slug.to_string();
        }
        job.location = merged.get("location").and_then(Location::from_bson);
        let version = match merged.get(VERSION_FIELD) {
            Some(Bson::Int32(v)) => i64::from(*v),
            Some(Bson::Int64(v)) => *v,
            _ => 0,
        };
        let updated = Document::with_id(stored.id, job.to_document(version));
        let record = JobRecord::from(updated.clone()).without_version();
        self.jobs.update_document(&doc_id, updated)?;
        info!("job {id} updated");
        Ok(record)
    }

    /// # Errors
    /// `InvalidDocumentId` or `NoSuchDocument`.
    pub fn delete_job(&self, id: &str) -> Result<(), DbError> {
        let doc_id = DocumentId::from_str(id)?;
        if !self.jobs.delete_document(&doc_id)? {
            return Err(DbError::NoSuchDocument(id.to_string()));
        }
        info!("job {id} deleted");
        Ok(())
    }

    /// Jobs located within `distance_miles` of the zipcode's coordinates.
    ///
    /// # Errors
    /// `Validation` for a negative or non-finite distance, `Geocode` for an unknown zipcode.
    pub fn search_in_radius(&self, zipcode: &str, distance_miles: f64) -> Result<Vec<JobRecord>, DbError> {
        if !distance_miles.is_finite() || distance_miles < 0.0 {
            return Err(DbError::Validation(format!("distance: '{distance_miles}' is not a distance in miles")));
        }
        let place = self.geocoder.geocode(zipcode)?;
        let mut q = QueryDescriptor::find(Arc::clone(&self.jobs));
        q.narrow(Filter::GeoWithin {
            path: "location".into(),
            center: place.point(),
            radius: miles_to_radians(distance_miles),
        })
        .project(Projection::Exclude(vec![VERSION_FIELD.to_string()]));
        debug!("search_in_radius zipcode={zipcode} filter={:?}", q.filter());
        Ok(q.execute()?.into_iter().map(JobRecord::from).collect())
    }

    /// Per-experience figures for the jobs whose title or description mention `topic`.
    /// An empty vector means nothing matched.
    ///
    /// # Errors
    /// `QueryError` if the text index is missing.
    pub fn job_stats(&self, topic: &str) -> Result<Vec<TopicStats>, DbError> {
        let mut q = QueryDescriptor::find(Arc::clone(&self.jobs));
        q.narrow(Filter::Text { fields: self.jobs.text_index_fields(), search: topic.to_string() });
        let docs = q.execute()?;
        debug!("job_stats topic='{topic}' matched {}", docs.len());
        Ok(group_by_experience(&docs))
    }
}
