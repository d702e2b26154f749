use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wicket_core::issue::{FetchError, Issue};

pub const FETCH_DEADLINE: Duration = Duration::from_secs(5);

/// Capability to fetch a single issue from the upstream tracker.
#[async_trait]
pub trait IssueFetcher: Send + Sync {
    async fn fetch_issue(&self, issue_id: &str) -> Result<Issue, FetchError>;
}

/// Capability the HTTP layer consumes.
#[async_trait]
pub trait IssueProvider: Send + Sync {
    async fn get_issue_details(&self, issue_id: &str) -> Result<Issue, FetchError>;
}

pub struct IssueService {
    fetcher: Arc<dyn IssueFetcher>,
    deadline: Duration,
}

impl IssueService {
    pub fn new(fetcher: Arc<dyn IssueFetcher>) -> Self {
        Self::with_deadline(fetcher, FETCH_DEADLINE)
    }

    pub fn with_deadline(fetcher: Arc<dyn IssueFetcher>, deadline: Duration) -> Self {
        Self { fetcher, deadline }
    }
}

#[async_trait]
impl IssueProvider for IssueService {
    async fn get_issue_details(&self, issue_id: &str) -> Result<Issue, FetchError> {
        // Fresh deadline per call; an outer caller deadline is not inherited.
        let result = match tokio::time::timeout(self.deadline, self.fetcher.fetch_issue(issue_id))
            .await
        {
            Ok(res) => res,
            Err(_) => Err(FetchError::Transport(format!(
                "issue fetch exceeded the {:?} deadline",
                self.deadline
            ))),
        };

        match &result {
            Ok(issue) => {
                tracing::info!(issue_id = %issue_id, key = %issue.key, "issue details retrieved");
            }
            Err(err) => {
                tracing::error!(issue_id = %issue_id, error = %err, "issue fetch failed");
            }
        }

        result
    }
}
