//! Profile handlers.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::handlers::auth::UserResponse;
use crate::state::AppState;

/// Profile update request.
///
/// Resume handling is a stub: the actual file upload lives in an external
/// service, and this endpoint only records the resulting URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub resume_url: Option<String>,
}

/// Update the caller's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    request.validate()?;

    let updated = state
        .accounts
        .update_profile(&user.id, &request.name, request.resume_url.as_deref())
        .await?;

    Ok(Json(UserResponse::from(&updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_request_requires_name() {
        let request: UpdateProfileRequest = serde_json::from_str(r#"{"name":""}"#).unwrap();
        assert!(request.validate().is_err());

        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"name":"Alice","resumeUrl":"/r.pdf"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.resume_url.as_deref(), Some("/r.pdf"));
    }
}
