//! Credential issuance and verification.
//!
//! A credential is a signed, time-limited JWT carrying a user id and role.
//! Verification is stateless: any instance holding the signing secret can
//! validate a token, so there is no session store and no mid-lifetime
//! revocation. Logout only removes the client-held copy.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jobhub_models::{Role, UserId};

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_auth_outcome;
use crate::state::AppState;

/// Cookie that carries the credential between requests.
pub const COOKIE_NAME: &str = "token";

/// Credential lifetime.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Signed token claims.
///
/// The role deserializes into the strict [`Role`] enum, so a token whose
/// role claim is any other string fails verification outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: String,
    /// Account role
    pub role: Role,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// The verified identity behind one request. Derived fresh from the
/// credential on every request, never persisted or cached.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

/// Issues and verifies credentials with a single HS256 secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Issue a credential for a user. Only fails if signing itself fails,
    /// which is a configuration-class error.
    pub fn issue(&self, user_id: &UserId, role: Role) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: user_id.as_str().to_string(),
            role,
            iat: now,
            exp: now + TOKEN_TTL_DAYS * 24 * 60 * 60,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign credential: {}", e)))
    }

    /// Verify a credential and extract the principal.
    ///
    /// Every failure mode (missing, malformed, bad signature, expired,
    /// wrong algorithm, unknown role) collapses into `None`; callers are
    /// not told which one applied.
    pub fn verify(&self, token: &str) -> Option<Principal> {
        if token.is_empty() {
            return None;
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| Principal {
                id: UserId::from_string(data.claims.id),
                role: data.claims.role,
            })
    }
}

/// Build the credential cookie: http-only, strict same-site, path `/`,
/// 30-day max-age. `Secure` everywhere except local development.
pub fn auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(COOKIE_NAME, token);
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::days(TOKEN_TTL_DAYS));
    cookie
}

/// Build the logout cookie: empty value with an immediate past expiry,
/// which instructs the client to drop its copy.
pub fn clear_auth_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(COOKIE_NAME, "");
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_expires(time::OffsetDateTime::UNIX_EPOCH);
    cookie
}

/// Authenticated user extracted from the request.
///
/// Reads the `token` cookie first, then falls back to an
/// `Authorization: Bearer` header. API handlers re-verify through this
/// extractor on every request; passing the page-level gate is never
/// sufficient because `/api` bypasses it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub role: Role,
}

impl From<Principal> for AuthUser {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            role: principal.role,
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = jar
            .get(COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .or_else(|| {
                parts
                    .headers
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
                    .map(|v| v.to_string())
            });

        let Some(token) = token else {
            record_auth_outcome("missing");
            return Err(ApiError::unauthorized("Not authorized, no token"));
        };

        match state.tokens.verify(&token) {
            Some(principal) => {
                record_auth_outcome("ok");
                Ok(AuthUser::from(principal))
            }
            None => {
                record_auth_outcome("invalid");
                Err(ApiError::unauthorized("Not authorized, invalid token"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret")
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let tokens = service();
        let user_id = UserId::new();

        let token = tokens.issue(&user_id, Role::Recruiter).unwrap();
        let principal = tokens.verify(&token).unwrap();

        assert_eq!(principal.id, user_id);
        assert_eq!(principal.role, Role::Recruiter);
    }

    #[test]
    fn test_empty_token_is_invalid() {
        assert!(service().verify("").is_none());
    }

    #[test]
    fn test_malformed_token_is_invalid() {
        assert!(service().verify("not-a-jwt").is_none());
        assert!(service().verify("a.b.c").is_none());
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let tokens = service();
        let token = tokens.issue(&UserId::new(), Role::User).unwrap();

        // Flip a byte anywhere in the token
        let mut bytes = token.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(tokens.verify(&tampered).is_none());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = service().issue(&UserId::new(), Role::User).unwrap();
        let other = TokenService::new("a-different-secret");
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: UserId::new().as_str().to_string(),
            role: Role::User,
            iat: now - 7200,
            exp: now - 3600, // well past the validation leeway
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn test_wrong_algorithm_is_invalid() {
        let tokens = service();
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: UserId::new().as_str().to_string(),
            role: Role::User,
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn test_unknown_role_claim_is_invalid() {
        let tokens = service();
        let now = Utc::now().timestamp();

        // Hand-rolled claims with a role outside the enum
        #[derive(Serialize)]
        struct RawClaims<'a> {
            id: &'a str,
            role: &'a str,
            iat: i64,
            exp: i64,
        }
        let token = encode(
            &Header::default(),
            &RawClaims {
                id: "u1",
                role: "admin",
                iat: now,
                exp: now + 3600,
            },
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        assert!(tokens.verify(&token).is_none());
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie("tok".to_string(), true);
        assert_eq!(cookie.name(), COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let cookie = clear_auth_cookie(false);
        assert_eq!(cookie.value(), "");
        let expires = cookie.expires_datetime().unwrap();
        assert!(expires < time::OffsetDateTime::now_utc());
    }
}
