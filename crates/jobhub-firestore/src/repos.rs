//! Typed repositories for users, jobs, and applications.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use jobhub_models::{
    Application, ApplicationId, ApplicationStatus, Job, JobFilter, JobId, Role, User, UserId,
};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, Filter, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};

const USERS: &str = "users";
const JOBS: &str = "jobs";
const APPLICATIONS: &str = "applications";

/// Repository for user account documents.
#[derive(Clone)]
pub struct UserRepository {
    client: FirestoreClient,
}

impl UserRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Create a new account document.
    pub async fn create(&self, user: &User) -> FirestoreResult<()> {
        let fields = user_to_fields(user);
        self.client
            .create_document(USERS, user.id.as_str(), fields)
            .await?;
        info!("Created user account {} ({})", user.id, user.role);
        Ok(())
    }

    /// Get an account by ID.
    pub async fn get(&self, user_id: &UserId) -> FirestoreResult<Option<User>> {
        let doc = self.client.get_document(USERS, user_id.as_str()).await?;
        doc.map(|d| document_to_user(&d)).transpose()
    }

    /// Find an account by login email.
    ///
    /// Retried: this sits on the login path, where a transient store
    /// hiccup would otherwise surface as a failed sign-in.
    pub async fn find_by_email(&self, email: &str) -> FirestoreResult<Option<User>> {
        let query = StructuredQuery::newest_first(USERS)
            .with_filter(Filter::field_equals(
                "email",
                Value::StringValue(email.to_string()),
            ))
            .with_limit(1);

        let docs = self
            .client
            .with_retry("users_find_by_email", || {
                self.client.run_query(query.clone())
            })
            .await?;
        docs.first().map(document_to_user).transpose()
    }

    /// Update the mutable profile fields (name, resume URL).
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        name: &str,
        resume_url: Option<&str>,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        let mut mask = vec!["name".to_string(), "updated_at".to_string()];
        fields.insert("name".to_string(), name.to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        if let Some(url) = resume_url {
            fields.insert("resume_url".to_string(), url.to_firestore_value());
            mask.push("resume_url".to_string());
        }

        self.client
            .update_document(USERS, user_id.as_str(), fields, Some(mask))
            .await?;
        Ok(())
    }
}

/// Repository for job posting documents.
#[derive(Clone)]
pub struct JobRepository {
    client: FirestoreClient,
}

impl JobRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Create a new job posting.
    pub async fn create(&self, job: &Job) -> FirestoreResult<()> {
        let fields = job_to_fields(job);
        self.client
            .create_document(JOBS, job.id.as_str(), fields)
            .await?;
        info!("Created job {} by recruiter {}", job.id, job.recruiter);
        Ok(())
    }

    /// Get a job by ID.
    pub async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        let doc = self.client.get_document(JOBS, job_id.as_str()).await?;
        doc.map(|d| document_to_job(&d)).transpose()
    }

    /// List jobs for the public board, newest first.
    ///
    /// The category filter is pushed into the query; location and salary
    /// are filtered locally after the fetch.
    pub async fn list(&self, filter: &JobFilter) -> FirestoreResult<Vec<Job>> {
        let mut query = StructuredQuery::newest_first(JOBS);
        if let Some(category) = &filter.category {
            query = query.with_filter(Filter::field_equals(
                "category",
                Value::StringValue(category.clone()),
            ));
        }

        let docs = self
            .client
            .with_retry("jobs_list", || self.client.run_query(query.clone()))
            .await?;
        let mut jobs = parse_documents(&docs, document_to_job, JOBS);
        jobs.retain(|job| filter.matches_locally(job));
        Ok(jobs)
    }

    /// Most recent postings, for the recommendation placeholder.
    pub async fn list_recent(&self, limit: i32) -> FirestoreResult<Vec<Job>> {
        let query = StructuredQuery::newest_first(JOBS).with_limit(limit);
        let docs = self.client.run_query(query).await?;
        Ok(parse_documents(&docs, document_to_job, JOBS))
    }

    /// All postings owned by a recruiter, newest first.
    pub async fn list_by_recruiter(&self, recruiter: &UserId) -> FirestoreResult<Vec<Job>> {
        let query = StructuredQuery::newest_first(JOBS).with_filter(Filter::field_equals(
            "recruiter",
            Value::StringValue(recruiter.as_str().to_string()),
        ));
        let docs = self.client.run_query(query).await?;
        Ok(parse_documents(&docs, document_to_job, JOBS))
    }

    /// Replace the mutable fields of a job posting.
    pub async fn update(&self, job: &Job) -> FirestoreResult<()> {
        let mut fields = job_to_fields(job);
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        let mask = vec![
            "title".to_string(),
            "company".to_string(),
            "location".to_string(),
            "description".to_string(),
            "requirements".to_string(),
            "salary_min".to_string(),
            "salary_max".to_string(),
            "category".to_string(),
            "updated_at".to_string(),
        ];

        self.client
            .update_document(JOBS, job.id.as_str(), fields, Some(mask))
            .await?;
        Ok(())
    }

    /// Delete a job posting.
    pub async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        self.client.delete_document(JOBS, job_id.as_str()).await?;
        info!("Deleted job {}", job_id);
        Ok(())
    }
}

/// Repository for application documents.
#[derive(Clone)]
pub struct ApplicationRepository {
    client: FirestoreClient,
}

impl ApplicationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Create a new application.
    pub async fn create(&self, application: &Application) -> FirestoreResult<()> {
        let fields = application_to_fields(application);
        self.client
            .create_document(APPLICATIONS, application.id.as_str(), fields)
            .await?;
        info!(
            "Created application {} (user {} -> job {})",
            application.id, application.user, application.job
        );
        Ok(())
    }

    /// Get an application by ID.
    pub async fn get(&self, id: &ApplicationId) -> FirestoreResult<Option<Application>> {
        let doc = self.client.get_document(APPLICATIONS, id.as_str()).await?;
        doc.map(|d| document_to_application(&d)).transpose()
    }

    /// Find an existing application for a `(user, job)` pair.
    ///
    /// Used as the duplicate-submission check before create.
    pub async fn find_by_user_and_job(
        &self,
        user: &UserId,
        job: &JobId,
    ) -> FirestoreResult<Option<Application>> {
        let query = StructuredQuery::newest_first(APPLICATIONS)
            .with_filter(Filter::and(vec![
                Filter::field_equals("user", Value::StringValue(user.as_str().to_string())),
                Filter::field_equals("job", Value::StringValue(job.as_str().to_string())),
            ]))
            .with_limit(1);

        let docs = self.client.run_query(query).await?;
        docs.first().map(document_to_application).transpose()
    }

    /// All applications submitted by a user, newest first.
    pub async fn list_by_user(&self, user: &UserId) -> FirestoreResult<Vec<Application>> {
        let query = StructuredQuery::newest_first(APPLICATIONS).with_filter(
            Filter::field_equals("user", Value::StringValue(user.as_str().to_string())),
        );
        let docs = self.client.run_query(query).await?;
        Ok(parse_documents(&docs, document_to_application, APPLICATIONS))
    }

    /// All applications for a job, newest first.
    pub async fn list_by_job(&self, job: &JobId) -> FirestoreResult<Vec<Application>> {
        let query = StructuredQuery::newest_first(APPLICATIONS).with_filter(
            Filter::field_equals("job", Value::StringValue(job.as_str().to_string())),
        );
        let docs = self.client.run_query(query).await?;
        Ok(parse_documents(&docs, document_to_application, APPLICATIONS))
    }

    /// Update the review status of an application.
    pub async fn update_status(
        &self,
        id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                APPLICATIONS,
                id.as_str(),
                fields,
                Some(vec!["status".to_string(), "updated_at".to_string()]),
            )
            .await?;
        Ok(())
    }

    /// Delete every application submitted to a job.
    ///
    /// Runs when the job itself is deleted, so orphaned applications do
    /// not linger in the collection.
    pub async fn delete_by_job(&self, job: &JobId) -> FirestoreResult<u32> {
        let applications = self.list_by_job(job).await?;
        let mut deleted = 0u32;

        for application in &applications {
            self.client
                .delete_document(APPLICATIONS, application.id.as_str())
                .await?;
            deleted += 1;
        }

        if deleted > 0 {
            info!("Deleted {} applications for job {}", deleted, job);
        }
        Ok(deleted)
    }
}

// =============================================================================
// Document Conversions
// =============================================================================

/// Parse a batch of documents, logging and skipping any that fail.
fn parse_documents<T>(
    docs: &[Document],
    parse: impl Fn(&Document) -> FirestoreResult<T>,
    collection: &str,
) -> Vec<T> {
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        match parse(doc) {
            Ok(item) => out.push(item),
            Err(e) => {
                warn!(
                    collection = %collection,
                    doc_id = %doc.doc_id().unwrap_or("?"),
                    error = %e,
                    "Failed to parse document"
                );
            }
        }
    }
    out
}

fn require_string(doc: &Document, field: &str) -> FirestoreResult<String> {
    doc.field(field)
        .and_then(String::from_firestore_value)
        .ok_or_else(|| {
            FirestoreError::InvalidResponse(format!(
                "missing or invalid field '{}' in {}",
                field,
                doc.doc_id().unwrap_or("?")
            ))
        })
}

fn require_i64(doc: &Document, field: &str) -> FirestoreResult<i64> {
    doc.field(field)
        .and_then(i64::from_firestore_value)
        .ok_or_else(|| {
            FirestoreError::InvalidResponse(format!(
                "missing or invalid field '{}' in {}",
                field,
                doc.doc_id().unwrap_or("?")
            ))
        })
}

fn require_timestamp(doc: &Document, field: &str) -> FirestoreResult<DateTime<Utc>> {
    doc.field(field)
        .and_then(DateTime::<Utc>::from_firestore_value)
        .ok_or_else(|| {
            FirestoreError::InvalidResponse(format!(
                "missing or invalid field '{}' in {}",
                field,
                doc.doc_id().unwrap_or("?")
            ))
        })
}

fn optional_string(doc: &Document, field: &str) -> Option<String> {
    doc.field(field).and_then(String::from_firestore_value)
}

fn user_to_fields(user: &User) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("name".to_string(), user.name.to_firestore_value());
    fields.insert("email".to_string(), user.email.to_firestore_value());
    fields.insert(
        "password_hash".to_string(),
        user.password_hash.to_firestore_value(),
    );
    fields.insert("role".to_string(), user.role.as_str().to_firestore_value());
    if let Some(company) = &user.company {
        fields.insert("company".to_string(), company.to_firestore_value());
    }
    fields.insert("resume_url".to_string(), user.resume_url.to_firestore_value());
    fields.insert("created_at".to_string(), user.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), user.updated_at.to_firestore_value());
    fields
}

fn document_to_user(doc: &Document) -> FirestoreResult<User> {
    let id = doc.doc_id().ok_or_else(|| {
        FirestoreError::InvalidResponse("user document without resource name".to_string())
    })?;

    let role: Role = require_string(doc, "role")?.parse().map_err(|_| {
        FirestoreError::InvalidResponse(format!("user {} has an unknown role", id))
    })?;

    Ok(User {
        id: UserId::from_string(id),
        name: require_string(doc, "name")?,
        email: require_string(doc, "email")?,
        password_hash: require_string(doc, "password_hash")?,
        role,
        company: optional_string(doc, "company"),
        resume_url: optional_string(doc, "resume_url").unwrap_or_default(),
        created_at: require_timestamp(doc, "created_at")?,
        updated_at: require_timestamp(doc, "updated_at")?,
    })
}

fn job_to_fields(job: &Job) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("title".to_string(), job.title.to_firestore_value());
    fields.insert("company".to_string(), job.company.to_firestore_value());
    fields.insert("location".to_string(), job.location.to_firestore_value());
    fields.insert(
        "description".to_string(),
        job.description.to_firestore_value(),
    );
    fields.insert(
        "requirements".to_string(),
        job.requirements.to_firestore_value(),
    );
    fields.insert("salary_min".to_string(), job.salary_min.to_firestore_value());
    fields.insert("salary_max".to_string(), job.salary_max.to_firestore_value());
    fields.insert("category".to_string(), job.category.to_firestore_value());
    fields.insert(
        "recruiter".to_string(),
        job.recruiter.as_str().to_firestore_value(),
    );
    fields.insert("created_at".to_string(), job.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), job.updated_at.to_firestore_value());
    fields
}

fn document_to_job(doc: &Document) -> FirestoreResult<Job> {
    let id = doc.doc_id().ok_or_else(|| {
        FirestoreError::InvalidResponse("job document without resource name".to_string())
    })?;

    Ok(Job {
        id: JobId::from_string(id),
        title: require_string(doc, "title")?,
        company: require_string(doc, "company")?,
        location: require_string(doc, "location")?,
        description: require_string(doc, "description")?,
        requirements: optional_string(doc, "requirements").unwrap_or_default(),
        salary_min: require_i64(doc, "salary_min")?,
        salary_max: require_i64(doc, "salary_max")?,
        category: require_string(doc, "category")?,
        recruiter: UserId::from_string(require_string(doc, "recruiter")?),
        created_at: require_timestamp(doc, "created_at")?,
        updated_at: require_timestamp(doc, "updated_at")?,
    })
}

fn application_to_fields(application: &Application) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert(
        "job".to_string(),
        application.job.as_str().to_firestore_value(),
    );
    fields.insert(
        "user".to_string(),
        application.user.as_str().to_firestore_value(),
    );
    fields.insert(
        "cover_letter".to_string(),
        application.cover_letter.to_firestore_value(),
    );
    fields.insert(
        "resume_url".to_string(),
        application.resume_url.to_firestore_value(),
    );
    fields.insert(
        "status".to_string(),
        application.status.as_str().to_firestore_value(),
    );
    fields.insert(
        "created_at".to_string(),
        application.created_at.to_firestore_value(),
    );
    fields.insert(
        "updated_at".to_string(),
        application.updated_at.to_firestore_value(),
    );
    fields
}

fn document_to_application(doc: &Document) -> FirestoreResult<Application> {
    let id = doc.doc_id().ok_or_else(|| {
        FirestoreError::InvalidResponse("application document without resource name".to_string())
    })?;

    let status: ApplicationStatus = require_string(doc, "status")?.parse().map_err(|_| {
        FirestoreError::InvalidResponse(format!("application {} has an unknown status", id))
    })?;

    Ok(Application {
        id: ApplicationId::from_string(id),
        job: JobId::from_string(require_string(doc, "job")?),
        user: UserId::from_string(require_string(doc, "user")?),
        cover_letter: optional_string(doc, "cover_letter").unwrap_or_default(),
        resume_url: optional_string(doc, "resume_url").unwrap_or_default(),
        status,
        created_at: require_timestamp(doc, "created_at")?,
        updated_at: require_timestamp(doc, "updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_fields(id: &str, fields: Vec<(&str, Value)>) -> Document {
        Document {
            name: Some(format!(
                "projects/p/databases/(default)/documents/test/{}",
                id
            )),
            fields: Some(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            ),
            create_time: None,
            update_time: None,
        }
    }

    #[test]
    fn test_user_round_trip() {
        let user = User::new(
            "Alice",
            "a@x.com",
            "$2b$10$hash",
            Role::Recruiter,
            Some("Acme".to_string()),
        );

        let fields = user_to_fields(&user);
        let doc = Document {
            name: Some(format!(
                "projects/p/databases/(default)/documents/users/{}",
                user.id
            )),
            fields: Some(fields),
            create_time: None,
            update_time: None,
        };

        let parsed = document_to_user(&doc).unwrap();
        assert_eq!(parsed.id, user.id);
        assert_eq!(parsed.email, "a@x.com");
        assert_eq!(parsed.role, Role::Recruiter);
        assert_eq!(parsed.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_user_with_unknown_role_is_rejected() {
        let doc = doc_with_fields(
            "u1",
            vec![
                ("name", Value::StringValue("Mallory".into())),
                ("email", Value::StringValue("m@x.com".into())),
                ("password_hash", Value::StringValue("h".into())),
                ("role", Value::StringValue("admin".into())),
                (
                    "created_at",
                    Value::TimestampValue("2025-06-01T00:00:00Z".into()),
                ),
                (
                    "updated_at",
                    Value::TimestampValue("2025-06-01T00:00:00Z".into()),
                ),
            ],
        );
        assert!(document_to_user(&doc).is_err());
    }

    #[test]
    fn test_job_round_trip() {
        let now = Utc::now();
        let job = Job {
            id: JobId::new(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "desc".into(),
            requirements: "reqs".into(),
            salary_min: 50_000,
            salary_max: 90_000,
            category: "Technology".into(),
            recruiter: UserId::new(),
            created_at: now,
            updated_at: now,
        };

        let doc = Document {
            name: Some(format!(
                "projects/p/databases/(default)/documents/jobs/{}",
                job.id
            )),
            fields: Some(job_to_fields(&job)),
            create_time: None,
            update_time: None,
        };

        let parsed = document_to_job(&doc).unwrap();
        assert_eq!(parsed.id, job.id);
        assert_eq!(parsed.salary_min, 50_000);
        assert_eq!(parsed.salary_max, 90_000);
        assert_eq!(parsed.recruiter, job.recruiter);
    }

    #[test]
    fn test_application_missing_field_is_error() {
        let doc = doc_with_fields("a1", vec![("job", Value::StringValue("j1".into()))]);
        assert!(document_to_application(&doc).is_err());
    }

    #[test]
    fn test_parse_documents_skips_bad_entries() {
        let good = doc_with_fields(
            "a1",
            vec![
                ("job", Value::StringValue("j1".into())),
                ("user", Value::StringValue("u1".into())),
                ("status", Value::StringValue("pending".into())),
                (
                    "created_at",
                    Value::TimestampValue("2025-06-01T00:00:00Z".into()),
                ),
                (
                    "updated_at",
                    Value::TimestampValue("2025-06-01T00:00:00Z".into()),
                ),
            ],
        );
        let bad = doc_with_fields("a2", vec![]);

        let parsed = parse_documents(&[good, bad], document_to_application, APPLICATIONS);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id.as_str(), "a1");
    }
}
