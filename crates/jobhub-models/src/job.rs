//! Job posting models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::UserId;

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A job posting stored in the `jobs` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Job title
    pub title: String,

    /// Hiring company
    pub company: String,

    /// Location (free text, e.g. "Remote" or a city)
    pub location: String,

    /// Full description
    pub description: String,

    /// Requirements text
    pub requirements: String,

    /// Salary range lower bound (USD/year)
    pub salary_min: i64,

    /// Salary range upper bound (USD/year)
    pub salary_max: i64,

    /// Category (e.g. "Technology")
    pub category: String,

    /// Owning recruiter
    pub recruiter: UserId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Listing filters for the public job board.
///
/// Category is matched exactly; location is a case-insensitive substring
/// match; `min_salary` keeps jobs whose upper salary bound reaches it.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub location: Option<String>,
    pub category: Option<String>,
    pub min_salary: Option<i64>,
}

impl JobFilter {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.category.is_none() && self.min_salary.is_none()
    }

    /// Check a job against the location and salary filters.
    ///
    /// Category is excluded here: it is an exact-match filter the store
    /// layer pushes into the query itself.
    pub fn matches_locally(&self, job: &Job) -> bool {
        if let Some(loc) = &self.location {
            if !job.location.to_lowercase().contains(&loc.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if job.salary_max < min {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        let now = Utc::now();
        Job {
            id: JobId::new(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Remote (EU)".into(),
            description: "Build things".into(),
            requirements: "Rust".into(),
            salary_min: 50_000,
            salary_max: 90_000,
            category: "Technology".into(),
            recruiter: UserId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches() {
        let filter = JobFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches_locally(&sample_job()));
    }

    #[test]
    fn test_location_filter_is_case_insensitive_substring() {
        let filter = JobFilter {
            location: Some("remote".into()),
            ..Default::default()
        };
        assert!(filter.matches_locally(&sample_job()));

        let filter = JobFilter {
            location: Some("berlin".into()),
            ..Default::default()
        };
        assert!(!filter.matches_locally(&sample_job()));
    }

    #[test]
    fn test_min_salary_filters_on_upper_bound() {
        let filter = JobFilter {
            min_salary: Some(90_000),
            ..Default::default()
        };
        assert!(filter.matches_locally(&sample_job()));

        let filter = JobFilter {
            min_salary: Some(90_001),
            ..Default::default()
        };
        assert!(!filter.matches_locally(&sample_job()));
    }
}
