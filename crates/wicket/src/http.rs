use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wicket_core::issue::Issue;

use crate::service::IssueProvider;

#[derive(Clone)]
struct AppState {
    issues: Arc<dyn IssueProvider>,
}

pub fn router(issues: Arc<dyn IssueProvider>) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/issue", get(issue_id_missing))
        .route("/issue/", get(issue_id_missing))
        .route("/issue/:id", get(get_issue))
        .route("/issues", get(get_issues))
        .fallback(unknown_route)
        .with_state(AppState { issues })
}

async fn liveness() -> Response {
    Json(json!({ "message": "service is running" })).into_response()
}

async fn issue_id_missing() -> Response {
    tracing::warn!("issue request without an id");
    error_body(StatusCode::BAD_REQUEST, "issue id is required")
}

async fn get_issue(State(state): State<AppState>, Path(issue_id): Path<String>) -> Response {
    if issue_id.trim().is_empty() {
        tracing::warn!("issue request without an id");
        return error_body(StatusCode::BAD_REQUEST, "issue id is required");
    }

    match state.issues.get_issue_details(&issue_id).await {
        Ok(issue) => (StatusCode::OK, Json(issue)).into_response(),
        // The specific failure kind stays in the logs.
        Err(_) => error_body(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch issue"),
    }
}

#[derive(Debug, Deserialize)]
struct IssuesQuery {
    #[serde(default, rename = "issueIDs")]
    issue_ids: Option<String>,
}

#[derive(Debug, Serialize)]
struct IssueList {
    issues: Vec<Issue>,
}

async fn get_issues(State(state): State<AppState>, Query(query): Query<IssuesQuery>) -> Response {
    let raw = query.issue_ids.unwrap_or_default();
    if raw.is_empty() {
        tracing::warn!("issues request without issueIDs");
        return error_body(StatusCode::BAD_REQUEST, "at least one issue id is required");
    }

    // Lookups run one at a time; failed ids are dropped from the result.
    let mut issues = Vec::new();
    for issue_id in raw.split(',') {
        let issue_id = issue_id.trim();
        match state.issues.get_issue_details(issue_id).await {
            Ok(issue) => issues.push(issue),
            Err(err) => {
                tracing::warn!(issue_id = %issue_id, error = %err, "dropping failed lookup");
            }
        }
    }

    Json(IssueList { issues }).into_response()
}

async fn unknown_route() -> Response {
    error_body(StatusCode::NOT_FOUND, "no such route")
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
