//! Application state.

use std::sync::Arc;

use jobhub_firestore::{ApplicationRepository, FirestoreClient, JobRepository, UserRepository};

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::services::AccountService;

/// Shared application state.
///
/// Built once at startup; everything in here is read-only afterwards, so
/// requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub firestore: Arc<FirestoreClient>,
    pub tokens: Arc<TokenService>,
    pub users: UserRepository,
    pub jobs: JobRepository,
    pub applications: ApplicationRepository,
    pub accounts: AccountService,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let firestore = Arc::new(FirestoreClient::from_env().await?);
        let tokens = Arc::new(TokenService::new(&config.jwt_secret));

        let users = UserRepository::new((*firestore).clone());
        let jobs = JobRepository::new((*firestore).clone());
        let applications = ApplicationRepository::new((*firestore).clone());
        let accounts = AccountService::new(users.clone());

        Ok(Self {
            config,
            firestore,
            tokens,
            users,
            jobs,
            applications,
            accounts,
        })
    }
}
