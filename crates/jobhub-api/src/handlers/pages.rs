//! Server-rendered page shells.
//!
//! Actual page rendering belongs to the frontend; these handlers exist so
//! the access gate has real routes to protect and return minimal HTML
//! placeholders that load the client application.

use axum::extract::Path;
use axum::response::Html;

fn shell(title: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title} · JobHub</title></head>\n\
         <body><div id=\"app\" data-page=\"{title}\"></div><script src=\"/static/app.js\"></script></body>\n</html>\n"
    ))
}

pub async fn home_page() -> Html<String> {
    shell("Home")
}

pub async fn login_page() -> Html<String> {
    shell("Login")
}

pub async fn register_page() -> Html<String> {
    shell("Register")
}

pub async fn jobs_page() -> Html<String> {
    shell("Jobs")
}

pub async fn job_detail_page(Path(_job_id): Path<String>) -> Html<String> {
    shell("Job")
}

pub async fn dashboard_page() -> Html<String> {
    shell("Dashboard")
}

pub async fn profile_page() -> Html<String> {
    shell("Profile")
}

pub async fn apply_page(Path(_job_id): Path<String>) -> Html<String> {
    shell("Apply")
}

pub async fn recruiter_dashboard_page() -> Html<String> {
    shell("Recruiter Dashboard")
}

pub async fn recruiter_new_job_page() -> Html<String> {
    shell("New Job")
}

pub async fn recruiter_profile_page() -> Html<String> {
    shell("Recruiter Profile")
}
