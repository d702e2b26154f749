use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One issue as served to callers: the tracker key plus the subset of
/// fields this service exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub fields: IssueFields,
}

/// Jira leaves out or nulls most of these depending on the issue, so the
/// nested objects are optional and plain strings fall back to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<NamedField>,
    #[serde(default)]
    pub assignee: Option<UserField>,
    #[serde(default)]
    pub reporter: Option<UserField>,
    #[serde(default)]
    pub priority: Option<NamedField>,
    #[serde(default, rename = "issuetype")]
    pub issue_type: Option<NamedField>,
    #[serde(default)]
    pub project: Option<NamedField>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserField {
    #[serde(default, rename = "displayName")]
    pub display_name: String,
}

/// Error body Jira attaches to non-2xx responses. Decoded best-effort; a
/// body that fails to parse is treated as the empty default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraErrorBody {
    #[serde(default, rename = "errorMessages")]
    pub error_messages: Vec<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

/// Every way fetching one issue can fail.
///
/// `Transport` and `Decode` carry the rendered cause so the enum stays
/// comparable in tests and so a deadline expiry can be represented without
/// an underlying client error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("issue id must not be empty")]
    EmptyIssueId,
    #[error("unauthorized: check the configured API token")]
    Unauthorized,
    #[error("no access to issue {issue_id}")]
    Forbidden { issue_id: String },
    #[error("issue {issue_id} not found")]
    NotFound { issue_id: String },
    #[error("unexpected status {status} from tracker: {error_messages:?}")]
    Remote {
        status: u16,
        error_messages: Vec<String>,
    },
    #[error("malformed issue body: {0}")]
    Decode(String),
    #[error("transport failure: {0}")]
    Transport(String),
}
