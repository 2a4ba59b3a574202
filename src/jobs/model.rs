use crate::errors::DbError;
use crate::query::geo::{GeoPoint, point_from_bson};
use crate::query::{FieldKind, FieldSpec, VERSION_FIELD};
use bson::{Bson, Document as BsonDocument, doc};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MAX_CHARS: usize = 100;
/// Days a posting stays open when no `lastDate` is given.
pub const DEFAULT_OPEN_DAYS: i64 = 7;

/// Storage types of the job fields, for casting query-string values.
pub static JOB_SCHEMA: [FieldSpec; 19] = [
    FieldSpec::new("title", FieldKind::String),
    FieldSpec::new("slug", FieldKind::String),
    FieldSpec::new("description", FieldKind::String),
    FieldSpec::new("email", FieldKind::String),
    FieldSpec::new("address", FieldKind::String),
    FieldSpec::new("company", FieldKind::String),
    FieldSpec::new("industry", FieldKind::String),
    FieldSpec::new("jobType", FieldKind::String),
    FieldSpec::new("minEducation", FieldKind::String),
    FieldSpec::new("positions", FieldKind::Number),
    FieldSpec::new("experience", FieldKind::String),
    FieldSpec::new("salary", FieldKind::Number),
    FieldSpec::new("postingDate", FieldKind::Date),
    FieldSpec::new("lastDate", FieldKind::Date),
    FieldSpec::new("location.formattedAddress", FieldKind::String),
    FieldSpec::new("location.city", FieldKind::String),
    FieldSpec::new("location.state", FieldKind::String),
    FieldSpec::new("location.zipcode", FieldKind::String),
    FieldSpec::new("location.country", FieldKind::String),
];

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// # Errors
            /// Returns `Validation` naming the field when `s` is not one of the options.
            pub fn parse(s: &str) -> Result<Self, DbError> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DbError::Validation(format!(
                        "{}: '{other}' is not one of {}",
                        $field,
                        Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(Industry, "industry", {
    Business => "Business",
    InformationTechnology => "Information Technology",
    Banking => "Banking",
    EducationTraining => "Education/Training",
    Telecommunication => "Telecommunication",
    Others => "Others",
});

choice_enum!(JobType, "jobType", {
    Permanent => "Permanent",
    Temporary => "Temporary",
    Internship => "Internship",
});

choice_enum!(Education, "minEducation", {
    Bachelors => "Bachelors",
    Masters => "Masters",
    Phd => "Phd",
});

choice_enum!(Experience, "experience", {
    NoExperience => "No Experience",
    OneToTwoYears => "1 Year - 2 Years",
    TwoToFiveYears => "2 Year - 5 Years",
    FivePlusYears => "5 Years+",
});

/// Where a posting is, as resolved from its address.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub point: GeoPoint,
    pub formatted_address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub country: String,
}

impl Location {
    /// GeoJSON point plus the address parts.
    #[must_use]
    pub fn to_bson(&self) -> Bson {
        Bson::Document(doc! {
            "type": "Point",
            "coordinates": [self.point.lng, self.point.lat],
            "formattedAddress": self.formatted_address.as_str(),
            "city": self.city.as_str(),
            "state": self.state.as_str(),
            "zipcode": self.zipcode.as_str(),
            "country": self.country.as_str(),
        })
    }

    #[must_use]
    pub fn from_bson(v: &Bson) -> Option<Self> {
        let point = point_from_bson(v)?;
        let Bson::Document(d) = v else {
            return None;
        };
        if d.get("type").is_some_and(|t| t.as_str() != Some("Point")) {
            return None;
        }
        let text = |k: &str| d.get_str(k).unwrap_or_default().to_string();
        Some(Self {
            point,
            formatted_address: text("formattedAddress"),
            city: text("city"),
            state: text("state"),
            zipcode: text("zipcode"),
            country: text("country"),
        })
    }
}

/// A job posting as submitted: nothing checked yet, everything optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub industry: Vec<String>,
    pub job_type: Option<String>,
    pub min_education: Option<String>,
    pub positions: Option<i64>,
    pub experience: Option<String>,
    pub salary: Option<f64>,
    pub posting_date: Option<DateTime<Utc>>,
    pub last_date: Option<DateTime<Utc>>,
}

/// A validated posting.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub email: Option<String>,
    pub address: String,
    pub location: Option<Location>,
    pub company: String,
    pub industry: Vec<Industry>,
    pub job_type: JobType,
    pub min_education: Education,
    pub positions: i64,
    pub experience: Experience,
    pub salary: f64,
    pub posting_date: DateTime<Utc>,
    pub last_date: DateTime<Utc>,
}

fn required(field: &str, value: Option<String>, message: &str) -> Result<String, DbError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DbError::Validation(format!("{field}: {message}"))),
    }
}

/// Lowercase words joined by `-`; every run of other characters is one separator.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !s.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| {
            !label.is_empty() && !label.starts_with('-') && !label.ends_with('-')
        })
}

impl NewJob {
    /// Checks every field and fills the defaults: one position, posted `now`,
    /// open for [`DEFAULT_OPEN_DAYS`]. The result has a slug but no location yet.
    ///
    /// # Errors
    /// Returns `Validation` naming the first offending field.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Job, DbError> {
        let title = required("title", self.title, "Please enter job title")?.trim().to_string();
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(DbError::Validation(format!(
                "title: Job title is too long! Can not exceed {TITLE_MAX_CHARS} characters."
            )));
        }
        let description = required("description", self.description, "Please enter job description.")?;
        let email = match self.email {
            Some(e) if !is_valid_email(&e) => {
                return Err(DbError::Validation("email: Please add a valid email.".into()));
            }
            other => other,
        };
        let address = required("address", self.address, "Please enter an address.")?;
        let company = required("company", self.company, "Please enter a company name.")?;
        if self.industry.is_empty() {
            return Err(DbError::Validation("industry: Please select at least one industry.".into()));
        }
        let industry = self.industry.iter().map(|s| Industry::parse(s)).collect::<Result<Vec<_>, _>>()?;
        let job_type = JobType::parse(&required("jobType", self.job_type, "Please select a job type.")?)?;
        let min_education =
            Education::parse(&required("minEducation", self.min_education, "Please select an education level.")?)?;
        let experience = Experience::parse(&required(
            "experience",
            self.experience,
            "Please enter experience required for this job.",
        )?)?;
        let salary = self
            .salary
            .filter(|s| s.is_finite())
            .ok_or_else(|| DbError::Validation("salary: Please enter expected salary for this job.".into()))?;
        let positions = self.positions.unwrap_or(1);
        if positions < 0 {
            return Err(DbError::Validation("positions: must not be negative".into()));
        }
        let posting_date = self.posting_date.unwrap_or(now);
        let last_date = self.last_date.unwrap_or(now + Duration::days(DEFAULT_OPEN_DAYS));
        Ok(Job {
            slug: slugify(&title),
            title,
            description,
            email,
            address,
            location: None,
            company,
            industry,
            job_type,
            min_education,
            positions,
            experience,
            salary,
            posting_date,
            last_date,
        })
    }
}

fn to_bson_date(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

/// Whole salaries are stored as integers so they print without a fraction.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn salary_bson(salary: f64) -> Bson {
    let whole = salary as i64;
    if salary.fract() == 0.0 && whole as f64 == salary { Bson::Int64(whole) } else { Bson::Double(salary) }
}

impl Job {
    /// The stored form, with revision counter `version`.
    #[must_use]
    pub fn to_document(&self, version: i64) -> BsonDocument {
        let industry: Vec<&str> = self.industry.iter().map(|i| i.as_str()).collect();
        let mut d = doc! {
            "title": self.title.as_str(),
            "slug": self.slug.as_str(),
            "description": self.description.as_str(),
        };
        if let Some(email) = &self.email {
            d.insert("email", email.as_str());
        }
        d.insert("address", self.address.as_str());
        if let Some(location) = &self.location {
            d.insert("location", location.to_bson());
        }
        d.insert("company", self.company.as_str());
        d.insert("industry", industry);
        d.insert("jobType", self.job_type.as_str());
        d.insert("minEducation", self.min_education.as_str());
        d.insert("positions", self.positions);
        d.insert("experience", self.experience.as_str());
        d.insert("salary", salary_bson(self.salary));
        d.insert("postingDate", to_bson_date(self.posting_date));
        d.insert("lastDate", to_bson_date(self.last_date));
        d.insert(VERSION_FIELD, version);
        d
    }
}
