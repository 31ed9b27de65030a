//! Application handlers.
//!
//! Submission is restricted to `user` accounts; status changes to the
//! recruiter who owns the related job; a single application is visible to
//! its applicant and that recruiter, nobody else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use jobhub_models::{Application, ApplicationId, ApplicationStatus, JobId, Role};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::jobs::ApplicantSummary;
use crate::state::AppState;

/// Job fields embedded in application responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobSummary {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// Application as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    /// `null` when the job was deleted after the application was made
    pub job: Option<AppliedJobSummary>,
    pub user: String,
    pub cover_letter: String,
    pub resume_url: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationResponse {
    fn new(application: Application, job: Option<AppliedJobSummary>) -> Self {
        Self {
            id: application.id.to_string(),
            job,
            user: application.user.to_string(),
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            status: application.status,
            created_at: application.created_at,
            updated_at: application.updated_at,
        }
    }
}

/// Submission request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub cover_letter: String,
    #[serde(default)]
    pub resume_url: String,
}

#[derive(Serialize)]
pub struct ApplicationMutationResponse {
    pub message: String,
    pub application: ApplicationResponse,
}

/// Submit an application. `user` accounts only, one per `(user, job)` pair.
pub async fn submit_application(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<SubmitApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApplicationMutationResponse>)> {
    if user.role != Role::User {
        return Err(ApiError::forbidden("Only users can submit applications"));
    }

    if request.job_id.is_empty() {
        return Err(ApiError::validation("jobId: Job ID is required"));
    }

    let job_id = JobId::from_string(request.job_id);
    let job = state
        .jobs
        .get(&job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if state
        .applications
        .find_by_user_and_job(&user.id, &job.id)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("You have already applied for this job"));
    }

    let application = Application::new(
        job.id.clone(),
        user.id.clone(),
        request.cover_letter,
        request.resume_url,
    );
    state.applications.create(&application).await?;

    info!(user = %user.id, job = %job.id, "Application submitted");

    let job_summary = AppliedJobSummary {
        id: job.id.to_string(),
        title: job.title,
        company: job.company,
        location: job.location,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApplicationMutationResponse {
            message: "Application submitted successfully".to_string(),
            application: ApplicationResponse::new(application, Some(job_summary)),
        }),
    ))
}

/// Build responses for a user's applications, embedding each job that
/// still exists.
async fn applications_with_jobs(
    state: &AppState,
    applications: Vec<Application>,
) -> Vec<ApplicationResponse> {
    let mut responses = Vec::with_capacity(applications.len());
    for application in applications {
        let job = state.jobs.get(&application.job).await.ok().flatten();
        let summary = job.map(|job| AppliedJobSummary {
            id: job.id.to_string(),
            title: job.title,
            company: job.company,
            location: job.location,
        });
        responses.push(ApplicationResponse::new(application, summary));
    }
    responses
}

/// List the caller's own applications, newest first.
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<ApplicationResponse>>> {
    let applications = state.applications.list_by_user(&user.id).await?;
    Ok(Json(applications_with_jobs(&state, applications).await))
}

/// Wrapper shape used by the dashboard variant of the listing.
#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub applications: Vec<ApplicationResponse>,
}

/// Same listing, wrapped in an object.
pub async fn list_my_applications_wrapped(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ApplicationListResponse>> {
    let applications = state.applications.list_by_user(&user.id).await?;
    Ok(Json(ApplicationListResponse {
        applications: applications_with_jobs(&state, applications).await,
    }))
}

/// Single application as seen by its applicant or the job's recruiter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetailResponse {
    pub id: String,
    pub job: Option<AppliedJobSummary>,
    pub user: ApplicantSummary,
    pub status: ApplicationStatus,
    pub cover_letter: String,
    pub resume_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fetch a single application. Visible only to the applicant and to the
/// recruiter who owns the related job.
pub async fn get_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<String>,
) -> ApiResult<Json<ApplicationDetailResponse>> {
    let application = state
        .applications
        .get(&ApplicationId::from_string(application_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    let job = state.jobs.get(&application.job).await?;

    let is_applicant = application.user == user.id;
    let is_job_owner = job
        .as_ref()
        .map(|job| job.recruiter == user.id)
        .unwrap_or(false);

    if !is_applicant && !is_job_owner {
        warn!(user = %user.id, application = %application.id, "Application access denied");
        return Err(ApiError::forbidden("Cannot access this application"));
    }

    let applicant = state.users.get(&application.user).await.ok().flatten();

    Ok(Json(ApplicationDetailResponse {
        id: application.id.to_string(),
        job: job.map(|job| AppliedJobSummary {
            id: job.id.to_string(),
            title: job.title,
            company: job.company,
            location: job.location,
        }),
        user: ApplicantSummary {
            id: application.user.to_string(),
            name: applicant.as_ref().map(|u| u.name.clone()),
            email: applicant.as_ref().map(|u| u.email.clone()),
        },
        status: application.status,
        cover_letter: application.cover_letter,
        resume_url: application.resume_url,
        created_at: application.created_at,
        updated_at: application.updated_at,
    }))
}

/// Status update request. The status arrives as a string so an
/// out-of-set value produces a field-level validation error rather than
/// a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Update the review status of an application. Only the recruiter who
/// owns the related job may do this.
pub async fn update_application_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApplicationMutationResponse>> {
    if user.role != Role::Recruiter {
        return Err(ApiError::forbidden(
            "Only recruiters can update application status",
        ));
    }

    let status: ApplicationStatus = request
        .status
        .parse()
        .map_err(|_| ApiError::validation("status: Invalid status value provided"))?;

    let mut application = state
        .applications
        .get(&ApplicationId::from_string(application_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    let job = state
        .jobs
        .get(&application.job)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.recruiter != user.id {
        warn!(user = %user.id, application = %application.id, "Status update denied");
        return Err(ApiError::forbidden(
            "Cannot update status for jobs you do not own",
        ));
    }

    state.applications.update_status(&application.id, status).await?;
    application.status = status;
    application.updated_at = Utc::now();

    info!(
        application = %application.id,
        status = %status,
        recruiter = %user.id,
        "Application status updated"
    );

    let job_summary = AppliedJobSummary {
        id: job.id.to_string(),
        title: job.title,
        company: job.company,
        location: job.location,
    };

    Ok(Json(ApplicationMutationResponse {
        message: "Application status updated successfully".to_string(),
        application: ApplicationResponse::new(application, Some(job_summary)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_accepts_camel_case_payload() {
        let request: SubmitApplicationRequest = serde_json::from_str(
            r#"{"jobId":"j1","coverLetter":"hello","resumeUrl":"/r.pdf"}"#,
        )
        .unwrap();
        assert_eq!(request.job_id, "j1");
        assert_eq!(request.cover_letter, "hello");
    }

    #[test]
    fn test_submit_request_defaults_optional_fields() {
        let request: SubmitApplicationRequest =
            serde_json::from_str(r#"{"jobId":"j1"}"#).unwrap();
        assert!(request.cover_letter.is_empty());
        assert!(request.resume_url.is_empty());
    }

    #[test]
    fn test_status_strings_cover_canonical_set() {
        for value in ["pending", "reviewed", "accepted", "rejected"] {
            assert!(value.parse::<ApplicationStatus>().is_ok());
        }
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }
}
