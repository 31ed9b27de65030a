//! User account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a user account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a new random user ID.
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Error returned when a role string is neither `user` nor `recruiter`.
#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

/// Account role. The two kinds are mutually exclusive: users submit
/// applications, recruiters post and manage jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Job seeker
    #[default]
    User,
    /// Job poster
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Recruiter => "recruiter",
        }
    }

    pub fn is_recruiter(&self) -> bool {
        matches!(self, Role::Recruiter)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "recruiter" => Ok(Role::Recruiter),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A user account stored in the `users` collection.
///
/// The password hash is never serialized; it only travels between the
/// store layer and the credential check at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Login email, unique across the collection
    pub email: String,

    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role
    #[serde(default)]
    pub role: Role,

    /// Company name (recruiters only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Uploaded resume URL (job seekers; empty until a resume is attached)
    #[serde(default)]
    pub resume_url: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account with a freshly minted ID.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        company: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            company,
            resume_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("recruiter".parse::<Role>().unwrap(), Role::Recruiter);
        assert!("admin".parse::<Role>().is_err());
        assert!("Recruiter".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_round_trip() {
        let json = serde_json::to_string(&Role::Recruiter).unwrap();
        assert_eq!(json, "\"recruiter\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::Recruiter);
    }

    #[test]
    fn test_role_serde_rejects_unknown() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("Alice", "a@x.com", "$2b$10$hash", Role::Recruiter, Some("Acme".into()));
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("$2b$10$hash"));
    }
}
