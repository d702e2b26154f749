use std::time::Duration;

use anyhow::{anyhow, Context as _};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use url::Url;
use wicket_core::config::Config;
use wicket_core::issue::{FetchError, Issue, JiraErrorBody};

use crate::service::IssueFetcher;

const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the issue endpoint of a Jira-compatible REST API.
///
/// Holds the one `reqwest::Client` the whole process shares; cloning is
/// cheap and clones reuse the same connection pool.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    api_root: Url,
    auth_token: String,
}

impl JiraClient {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        if cfg.jira_base_url.trim().is_empty() {
            return Err(anyhow!("missing jira base url"));
        }
        if cfg.jira_auth_token.trim().is_empty() {
            return Err(anyhow!("missing jira api token"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .user_agent(format!("wicket/{}", env!("CARGO_PKG_VERSION")))
            .timeout(TRANSPORT_TIMEOUT)
            .default_headers(headers)
            .build()
            .context("build reqwest client")?;

        let api_root = join_api_root(&cfg.jira_base_url, &cfg.jira_api_path)?;

        tracing::info!(base_url = %cfg.jira_base_url, "jira client ready");

        Ok(Self {
            client,
            api_root,
            auth_token: cfg.jira_auth_token.clone(),
        })
    }

    pub async fn fetch_issue(&self, issue_id: &str) -> Result<Issue, FetchError> {
        if issue_id.is_empty() {
            return Err(FetchError::EmptyIssueId);
        }

        let url = self.issue_url(issue_id)?;
        tracing::debug!(issue_id = %issue_id, url = %url, "requesting issue");

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.auth_token)
            .send()
            .await
            .map_err(|err| {
                tracing::error!(issue_id = %issue_id, error = %err, "jira request failed");
                FetchError::Transport(err.to_string())
            })?;

        match resp.status() {
            StatusCode::OK => {
                let body = resp.bytes().await.map_err(|err| {
                    tracing::error!(issue_id = %issue_id, error = %err, "reading jira response failed");
                    FetchError::Transport(err.to_string())
                })?;
                let issue: Issue = serde_json::from_slice(&body).map_err(|err| {
                    tracing::error!(issue_id = %issue_id, error = %err, "undecodable issue body");
                    FetchError::Decode(err.to_string())
                })?;
                tracing::info!(issue_id = %issue_id, key = %issue.key, "fetched issue");
                Ok(issue)
            }
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(issue_id = %issue_id, "jira rejected the API token");
                Err(FetchError::Unauthorized)
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!(issue_id = %issue_id, "no access to issue");
                Err(FetchError::Forbidden {
                    issue_id: issue_id.to_owned(),
                })
            }
            StatusCode::NOT_FOUND => {
                tracing::warn!(issue_id = %issue_id, "issue not found");
                Err(FetchError::NotFound {
                    issue_id: issue_id.to_owned(),
                })
            }
            status => {
                // Error bodies are decoded best-effort; anything unreadable
                // just leaves the message list empty.
                let body = resp.bytes().await.unwrap_or_default();
                let parsed: JiraErrorBody = serde_json::from_slice(&body).unwrap_or_default();
                tracing::warn!(
                    issue_id = %issue_id,
                    status = status.as_u16(),
                    messages = ?parsed.error_messages,
                    "unexpected status from jira"
                );
                Err(FetchError::Remote {
                    status: status.as_u16(),
                    error_messages: parsed.error_messages,
                })
            }
        }
    }

    fn issue_url(&self, issue_id: &str) -> Result<Url, FetchError> {
        let mut url = self.api_root.clone();
        {
            let Ok(mut segments) = url.path_segments_mut() else {
                return Err(FetchError::Transport(
                    "api root cannot hold path segments".to_owned(),
                ));
            };
            segments.pop_if_empty().extend(["issue", issue_id]);
        }
        Ok(url)
    }
}

#[async_trait]
impl IssueFetcher for JiraClient {
    async fn fetch_issue(&self, issue_id: &str) -> Result<Issue, FetchError> {
        JiraClient::fetch_issue(self, issue_id).await
    }
}

fn join_api_root(base_url: &str, api_path: &str) -> anyhow::Result<Url> {
    let base = base_url.trim().trim_end_matches('/');
    let path = api_path.trim().trim_start_matches('/');
    let mut joined = format!("{base}/{path}");
    if !joined.ends_with('/') {
        joined.push('/');
    }

    let url = Url::parse(&joined).with_context(|| format!("parse jira api url {joined:?}"))?;
    if url.cannot_be_a_base() {
        return Err(anyhow!("jira api url {joined:?} cannot hold path segments"));
    }
    Ok(url)
}
