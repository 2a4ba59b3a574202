use crate::errors::DbError;
use crate::query::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::model::Location;

/// One geocoding answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoPlace {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl GeoPlace {
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }
}

impl From<GeoPlace> for Location {
    fn from(p: GeoPlace) -> Self {
        Self {
            point: p.point(),
            formatted_address: p.formatted_address,
            city: p.city,
            state: p.state,
            zipcode: p.zipcode,
            country: p.country,
        }
    }
}

/// Resolves free-form addresses and zipcodes to coordinates.
pub trait Geocoder: Send + Sync {
    /// # Errors
    /// Returns `Geocode` when the query cannot be resolved.
    fn geocode(&self, query: &str) -> Result<GeoPlace, DbError>;
}

/// A fixed table of known places; lookups ignore case and surrounding blanks.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, GeoPlace>,
}

fn lookup_key(query: &str) -> String {
    query.trim().to_lowercase()
}

impl StaticGeocoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_place(mut self, query: &str, place: GeoPlace) -> Self {
        self.insert(query, place);
        self
    }

    pub fn insert(&mut self, query: &str, place: GeoPlace) {
        self.places.insert(lookup_key(query), place);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, query: &str) -> Result<GeoPlace, DbError> {
        self.places
            .get(&lookup_key(query))
            .cloned()
            .ok_or_else(|| DbError::Geocode(format!("no location found for '{}'", query.trim())))
    }
}
