//! Shared data models for the JobHub backend.
//!
//! This crate provides Serde-serializable types for:
//! - User accounts and the user/recruiter role split
//! - Job postings and listing filters
//! - Applications and their review status

pub mod application;
pub mod job;
pub mod user;

// Re-export common types
pub use application::{Application, ApplicationId, ApplicationStatus, ParseStatusError};
pub use job::{Job, JobFilter, JobId};
pub use user::{ParseRoleError, Role, User, UserId};
