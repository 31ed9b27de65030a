//! Authentication handlers: register, login, me, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;

use jobhub_models::{Role, User};

use crate::auth::{auth_cookie, clear_auth_cookie, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// User record as returned by the API (no password hash).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resume_url: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            company: user.company.clone(),
            resume_url: user.resume_url.clone(),
        }
    }
}

/// Registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Please provide a name"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub company: Option<String>,
}

/// Response for register and login: the account plus its credential.
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

/// Register a new account and sign the caller in.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    request.validate()?;

    let role = request.role.unwrap_or_default();
    let company = match role {
        Role::Recruiter => match request.company.filter(|c| !c.trim().is_empty()) {
            Some(company) => Some(company),
            None => {
                return Err(ApiError::validation(
                    "company: Company is required for recruiter accounts",
                ))
            }
        },
        Role::User => None,
    };

    let user = state
        .accounts
        .register(&request.name, &request.email, &request.password, role, company)
        .await?;

    let token = state.tokens.issue(&user.id, user.role)?;
    let jar = jar.add(auth_cookie(token.clone(), !state.config.is_development()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(&user),
            token,
        }),
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// When set, the account's role must match (the login form has
    /// separate user/recruiter tabs).
    #[serde(default)]
    pub role: Option<Role>,
}

/// Log in with email and password.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let user = state
        .accounts
        .authenticate(&request.email, &request.password)
        .await?;

    if let Some(expected) = request.role {
        if user.role != expected {
            return Err(ApiError::unauthorized(format!(
                "Invalid account type. Please login as a {}",
                expected
            )));
        }
    }

    let token = state.tokens.issue(&user.id, user.role)?;
    let jar = jar.add(auth_cookie(token.clone(), !state.config.is_development()));

    Ok((
        jar,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(&user),
            token,
        }),
    ))
}

/// Current principal's account record.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .accounts
        .get(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from(&account)))
}

/// Logout response.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Log out: clear the credential cookie. The token itself stays valid
/// until expiry; only the client-held copy is discarded.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.add(clear_auth_cookie(!state.config.is_development()));
    (
        jar,
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            name: "Alice".into(),
            email: "a@x.com".into(),
            password: "secret1".into(),
            role: Some(Role::Recruiter),
            company: Some("Acme".into()),
        };
        assert!(ok.validate().is_ok());

        let short_password = RegisterRequest {
            name: "Alice".into(),
            email: "a@x.com".into(),
            password: "short".into(),
            role: None,
            company: None,
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            name: "Alice".into(),
            email: "not-an-email".into(),
            password: "secret1".into(),
            role: None,
            company: None,
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_register_request_accepts_camel_case_payload() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"name":"Alice","email":"a@x.com","password":"secret1","role":"recruiter","company":"Acme"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Some(Role::Recruiter));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result = serde_json::from_str::<RegisterRequest>(
            r#"{"name":"Alice","email":"a@x.com","password":"secret1","role":"admin"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_user_response_hides_empty_fields() {
        let user = User::new("Bob", "b@x.com", "hash", Role::User, None);
        let json = serde_json::to_string(&UserResponse::from(&user)).unwrap();
        assert!(!json.contains("company"));
        assert!(!json.contains("resumeUrl"));
        assert!(!json.contains("hash"));
    }
}
