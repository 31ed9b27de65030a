//! Account service: registration and credential checks.

use jobhub_firestore::UserRepository;
use jobhub_models::{Role, User, UserId};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};

/// Wraps the user repository with password hashing and the
/// email-uniqueness rule.
#[derive(Clone)]
pub struct AccountService {
    users: UserRepository,
}

impl AccountService {
    /// Create a new account service.
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Register a new account. The email must not already be in use.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        company: Option<String>,
    ) -> ApiResult<User> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(ApiError::bad_request("User already exists"));
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

        let user = User::new(name, email, password_hash, role, company);
        self.users.create(&user).await?;

        info!("Registered {} account for {}", role, user.id);
        Ok(user)
    }

    /// Check login credentials. The error is identical for an unknown
    /// email and a wrong password, so the endpoint cannot be used to probe
    /// which emails have accounts.
    pub async fn authenticate(&self, email: &str, password: &str) -> ApiResult<User> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(ApiError::unauthorized("Invalid credentials"));
        };

        let matches = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| ApiError::internal(format!("Failed to verify password: {}", e)))?;

        if !matches {
            warn!("Failed login attempt for {}", user.id);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        Ok(user)
    }

    /// Fetch an account by id.
    pub async fn get(&self, user_id: &UserId) -> ApiResult<Option<User>> {
        Ok(self.users.get(user_id).await?)
    }

    /// Update the mutable profile fields and return the fresh record.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        name: &str,
        resume_url: Option<&str>,
    ) -> ApiResult<User> {
        self.users.update_profile(user_id, name, resume_url).await?;
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
