//! Document Mapper — turns one CSV row into one `JobDocument`.
//!
//! Best effort: a row is never rejected. Missing columns become empty
//! strings and a bad rating becomes `None`.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::search::models::JobDocument;

/// Rating marker the source data uses for "no rating".
pub const NO_DATA: &str = "NoData";

/// Which CSV header feeds which document field.
///
/// Every import path reads through one of these, chosen once in config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub title: String,
    pub company: String,
    pub rating: String,
    pub location: String,
    pub source: String,
    pub description: String,
    pub application_method: String,
}

impl ColumnMapping {
    /// Headers of the raw listing export (`Job Title`, `Company Name`, ...).
    /// `Salary Est` lands in `source`.
    pub fn listing() -> Self {
        Self {
            title: "Job Title".to_string(),
            company: "Company Name".to_string(),
            rating: "Company Ratings".to_string(),
            location: "Location".to_string(),
            source: "Salary Est".to_string(),
            description: "Description".to_string(),
            application_method: "Apply Type".to_string(),
        }
    }

    /// Lowercase headers named after the document fields.
    pub fn normalized() -> Self {
        Self {
            title: "title".to_string(),
            company: "company".to_string(),
            rating: "rating".to_string(),
            location: "location".to_string(),
            source: "source".to_string(),
            description: "description".to_string(),
            application_method: "application_method".to_string(),
        }
    }

    pub fn from_profile(profile: &str) -> Option<Self> {
        match profile.trim().to_ascii_lowercase().as_str() {
            "listing" => Some(Self::listing()),
            "normalized" => Some(Self::normalized()),
            _ => None,
        }
    }
}

/// Parses a raw rating. Empty, `NoData`, non-numeric and non-finite values
/// all map to `None`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == NO_DATA {
        return None;
    }
    raw.parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Maps one CSV row. `row_number` is the 1-based data-row position and
/// becomes the `job_id`.
pub fn map_row(
    row: &HashMap<String, String>,
    row_number: u32,
    imported_on: NaiveDate,
    columns: &ColumnMapping,
) -> JobDocument {
    let text = |column: &str| {
        row.get(column)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };

    JobDocument {
        id: row_number.to_string(),
        job_id: i64::from(row_number),
        title: text(&columns.title),
        company: text(&columns.company),
        rating: row.get(&columns.rating).and_then(|r| parse_rating(r)),
        location: text(&columns.location),
        source: text(&columns.source),
        description: text(&columns.description),
        application_method: text(&columns.application_method),
        posted_date: imported_on.format("%Y-%m-%d").to_string(),
    }
}
