//! Job posting handlers.
//!
//! The public board (list + detail) is anonymous; everything that mutates
//! a posting re-verifies the credential and then checks ownership against
//! the posting's recruiter reference.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use jobhub_models::{ApplicationStatus, Job, JobFilter, JobId, Role, User, UserId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::auth::MessageResponse;
use crate::state::AppState;

/// Recruiter fields embedded in job responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Job posting as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub category: String,
    pub recruiter: RecruiterSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobResponse {
    fn new(job: Job, recruiter: Option<&User>) -> Self {
        let summary = match recruiter {
            Some(user) => RecruiterSummary {
                id: user.id.to_string(),
                name: Some(user.name.clone()),
                company: user.company.clone(),
            },
            // The recruiter account may have been removed; keep the id
            None => RecruiterSummary {
                id: job.recruiter.to_string(),
                name: None,
                company: None,
            },
        };

        Self {
            id: job.id.to_string(),
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            requirements: job.requirements,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            category: job.category,
            recruiter: summary,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Query parameters for the public job list.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub location: Option<String>,
    pub category: Option<String>,
    pub min_salary: Option<i64>,
}

impl From<JobListQuery> for JobFilter {
    fn from(query: JobListQuery) -> Self {
        Self {
            location: query.location.filter(|s| !s.is_empty()),
            category: query.category.filter(|s| !s.is_empty()),
            min_salary: query.min_salary,
        }
    }
}

/// Fetch the owning recruiters for a batch of jobs, keyed by user id.
async fn recruiter_index(
    state: &AppState,
    jobs: &[Job],
) -> ApiResult<HashMap<String, User>> {
    let mut index = HashMap::new();
    for job in jobs {
        let key = job.recruiter.as_str().to_string();
        if index.contains_key(&key) {
            continue;
        }
        match state.users.get(&job.recruiter).await {
            Ok(Some(user)) => {
                index.insert(key, user);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(recruiter = %key, error = %e, "Failed to load recruiter for job listing");
            }
        }
    }
    Ok(index)
}

/// List jobs on the public board, newest first, with optional filters.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> ApiResult<Json<Vec<JobResponse>>> {
    let filter = JobFilter::from(query);
    let jobs = state.jobs.list(&filter).await?;

    let recruiters = recruiter_index(&state, &jobs).await?;
    let responses = jobs
        .into_iter()
        .map(|job| {
            let recruiter = recruiters.get(job.recruiter.as_str());
            JobResponse::new(job, recruiter)
        })
        .collect();

    Ok(Json(responses))
}

/// Create/update request body for a job posting.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[validate(length(min = 1, message = "Please provide a job title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please provide a company name"))]
    pub company: String,
    #[validate(length(min = 1, message = "Please provide a location"))]
    pub location: String,
    #[validate(length(min = 1, message = "Please provide a job description"))]
    pub description: String,
    #[validate(length(min = 1, message = "Please provide job requirements"))]
    pub requirements: String,
    pub salary_min: i64,
    pub salary_max: i64,
    #[validate(length(min = 1, message = "Please provide a job category"))]
    pub category: String,
}

impl JobRequest {
    /// Validate the body, including the salary range rule.
    fn check(&self) -> ApiResult<()> {
        self.validate()?;
        if self.salary_min < 0 || self.salary_max < 0 {
            return Err(ApiError::validation("salary: Salary must not be negative"));
        }
        if self.salary_min > self.salary_max {
            return Err(ApiError::validation(
                "salary: salaryMin must not exceed salaryMax",
            ));
        }
        Ok(())
    }

    fn into_job(self, recruiter: UserId) -> Job {
        let now = Utc::now();
        Job {
            id: JobId::new(),
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            requirements: self.requirements,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            category: self.category,
            recruiter,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Response wrapper for job mutations.
#[derive(Serialize)]
pub struct JobMutationResponse {
    pub message: String,
    pub job: JobResponse,
}

/// Create a job posting. Recruiters only.
pub async fn create_job(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobRequest>,
) -> ApiResult<(StatusCode, Json<JobMutationResponse>)> {
    if user.role != Role::Recruiter {
        warn!(user = %user.id, role = %user.role, "Job post attempt by non-recruiter");
        return Err(ApiError::forbidden("Only recruiters can post jobs"));
    }

    request.check()?;

    let job = request.into_job(user.id.clone());
    state.jobs.create(&job).await?;

    let recruiter = state.users.get(&user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobMutationResponse {
            message: "Job created successfully".to_string(),
            job: JobResponse::new(job, recruiter.as_ref()),
        }),
    ))
}

/// Recommended jobs for the signed-in user.
///
/// Placeholder logic: surface the newest postings until a real
/// recommendation signal exists.
#[derive(Serialize)]
pub struct RecommendedJobsResponse {
    pub jobs: Vec<JobResponse>,
}

pub async fn recommended_jobs(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<RecommendedJobsResponse>> {
    let jobs = state.jobs.list_recent(10).await?;
    let recruiters = recruiter_index(&state, &jobs).await?;

    let jobs = jobs
        .into_iter()
        .map(|job| {
            let recruiter = recruiters.get(job.recruiter.as_str());
            JobResponse::new(job, recruiter)
        })
        .collect();

    Ok(Json(RecommendedJobsResponse { jobs }))
}

/// One of the caller's own postings, with its application count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterJobResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub application_count: usize,
}

/// List the caller's own postings, newest first, each with the number of
/// applications received. Backs the recruiter dashboard.
pub async fn my_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<RecruiterJobResponse>>> {
    if user.role != Role::Recruiter {
        return Err(ApiError::forbidden("Only recruiters can list their jobs"));
    }

    let jobs = state.jobs.list_by_recruiter(&user.id).await?;
    let recruiter = state.users.get(&user.id).await?;

    let mut responses = Vec::with_capacity(jobs.len());
    for job in jobs {
        let application_count = state.applications.list_by_job(&job.id).await?.len();
        responses.push(RecruiterJobResponse {
            job: JobResponse::new(job, recruiter.as_ref()),
            application_count,
        });
    }

    Ok(Json(responses))
}

/// Public job detail.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    let job = state
        .jobs
        .get(&JobId::from_string(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    let recruiter = state.users.get(&job.recruiter).await?;
    Ok(Json(JobResponse::new(job, recruiter.as_ref())))
}

/// Update a job posting. Only the owning recruiter may do this.
pub async fn update_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
    Json(request): Json<JobRequest>,
) -> ApiResult<Json<JobMutationResponse>> {
    if user.role != Role::Recruiter {
        return Err(ApiError::forbidden("Only recruiters can update jobs"));
    }

    let existing = state
        .jobs
        .get(&JobId::from_string(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if existing.recruiter != user.id {
        warn!(user = %user.id, job = %existing.id, owner = %existing.recruiter, "Job update denied");
        return Err(ApiError::forbidden("You can only update your own jobs"));
    }

    request.check()?;

    let mut job = request.into_job(user.id.clone());
    job.id = existing.id;
    job.created_at = existing.created_at;
    state.jobs.update(&job).await?;

    let recruiter = state.users.get(&user.id).await?;

    Ok(Json(JobMutationResponse {
        message: "Job updated successfully".to_string(),
        job: JobResponse::new(job, recruiter.as_ref()),
    }))
}

/// Delete a job posting and every application submitted to it. Only the
/// owning recruiter may do this.
pub async fn delete_job(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    if user.role != Role::Recruiter {
        return Err(ApiError::forbidden("Only recruiters can delete jobs"));
    }

    let job = state
        .jobs
        .get(&JobId::from_string(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.recruiter != user.id {
        warn!(user = %user.id, job = %job.id, owner = %job.recruiter, "Job delete denied");
        return Err(ApiError::forbidden("You can only delete your own jobs"));
    }

    state.applications.delete_by_job(&job.id).await?;
    state.jobs.delete(&job.id).await?;

    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

/// Applicant fields embedded in per-job application listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One row in the recruiter's per-job application list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationResponse {
    pub id: String,
    pub job: JobRef,
    pub user: ApplicantSummary,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRef {
    pub id: String,
    pub title: String,
}

/// List applications for one job. Only the owning recruiter may view them.
pub async fn job_applications(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Vec<JobApplicationResponse>>> {
    let job = state
        .jobs
        .get(&JobId::from_string(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.recruiter != user.id {
        return Err(ApiError::forbidden(
            "Cannot view applications for jobs you do not own",
        ));
    }

    let applications = state.applications.list_by_job(&job.id).await?;

    let mut responses = Vec::with_capacity(applications.len());
    for application in applications {
        let applicant = state.users.get(&application.user).await.ok().flatten();
        responses.push(JobApplicationResponse {
            id: application.id.to_string(),
            job: JobRef {
                id: job.id.to_string(),
                title: job.title.clone(),
            },
            user: ApplicantSummary {
                id: application.user.to_string(),
                name: applicant.as_ref().map(|u| u.name.clone()),
                email: applicant.as_ref().map(|u| u.email.clone()),
            },
            status: application.status,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            created_at: application.created_at,
        });
    }

    Ok(Json(responses))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> JobRequest {
        JobRequest {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "Build things".into(),
            requirements: "Rust".into(),
            salary_min: 50_000,
            salary_max: 90_000,
            category: "Technology".into(),
        }
    }

    #[test]
    fn test_job_request_valid() {
        assert!(valid_request().check().is_ok());
    }

    #[test]
    fn test_job_request_rejects_missing_fields() {
        let mut request = valid_request();
        request.title = String::new();
        assert!(request.check().is_err());
    }

    #[test]
    fn test_job_request_rejects_inverted_salary_range() {
        let mut request = valid_request();
        request.salary_min = 100_000;
        request.salary_max = 90_000;
        assert!(request.check().is_err());
    }

    #[test]
    fn test_job_request_accepts_camel_case_payload() {
        let request: JobRequest = serde_json::from_str(
            r#"{"title":"Engineer","company":"Acme","location":"Remote",
                "description":"...","requirements":"...","category":"Technology",
                "salaryMin":50000,"salaryMax":90000}"#,
        )
        .unwrap();
        assert_eq!(request.salary_min, 50_000);
        assert_eq!(request.salary_max, 90_000);
    }

    #[test]
    fn test_query_filter_conversion_drops_empty_strings() {
        let query = JobListQuery {
            location: Some(String::new()),
            category: Some("Technology".into()),
            min_salary: Some(60_000),
        };
        let filter = JobFilter::from(query);
        assert!(filter.location.is_none());
        assert_eq!(filter.category.as_deref(), Some("Technology"));
        assert_eq!(filter.min_salary, Some(60_000));
    }
}
