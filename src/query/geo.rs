use bson::Bson;

/// Mean Earth radius in miles, used to turn a search distance into radians.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// A longitude/latitude pair in degrees (GeoJSON order).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

#[must_use]
pub fn miles_to_radians(miles: f64) -> f64 {
    miles / EARTH_RADIUS_MILES
}

/// Great-circle angle between two points, in radians (haversine).
#[must_use]
pub fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

fn as_f64(v: &Bson) -> Option<f64> {
    match v {
        Bson::Double(f) => Some(*f),
        Bson::Int32(i) => Some(f64::from(*i)),
        #[allow(clippy::cast_precision_loss)]
        Bson::Int64(i) => Some(*i as f64),
        _ => None,
    }
}

/// Accepts a GeoJSON point document or a bare `[lng, lat]` array.
#[must_use]
pub fn point_from_bson(v: &Bson) -> Option<GeoPoint> {
    let coords = match v {
        Bson::Document(d) => d.get_array("coordinates").ok()?,
        Bson::Array(a) => a,
        _ => return None,
    };
    match coords.as_slice() {
        [lng, lat, ..] => Some(GeoPoint::new(as_f64(lng)?, as_f64(lat)?)),
        _ => None,
    }
}
