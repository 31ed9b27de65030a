//! Job application models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{JobId, UserId};

/// Unique identifier for an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Generate a new random application ID.
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

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ApplicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApplicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Error returned for a status string outside the canonical set.
#[derive(Debug, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct ParseStatusError(pub String);

/// Review status of an application.
///
/// The canonical set is pending/reviewed/accepted/rejected; every status
/// transition endpoint accepts exactly these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    /// Submitted, not yet looked at
    #[default]
    Pending,
    /// Seen by the recruiter
    Reviewed,
    /// Accepted
    Accepted,
    /// Rejected
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// An application stored in the `applications` collection.
///
/// One per `(user, job)` pair; the store layer rejects duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique application ID
    pub id: ApplicationId,

    /// Job applied to
    pub job: JobId,

    /// Applicant
    pub user: UserId,

    /// Cover letter text (may be empty)
    #[serde(default)]
    pub cover_letter: String,

    /// Resume URL (may be empty)
    #[serde(default)]
    pub resume_url: String,

    /// Review status
    #[serde(default)]
    pub status: ApplicationStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Create a new pending application.
    pub fn new(job: JobId, user: UserId, cover_letter: String, resume_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::new(),
            job,
            user,
            cover_letter,
            resume_url,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "pending".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Pending
        );
        assert_eq!(
            "reviewed".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Reviewed
        );
        assert!("in_review".parse::<ApplicationStatus>().is_err());
        assert!("Accepted".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Reviewed.is_terminal());
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_new_application_is_pending() {
        let app = Application::new(JobId::new(), UserId::new(), String::new(), String::new());
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.created_at, app.updated_at);
    }
}
