use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wicket::service::{IssueFetcher, IssueProvider, IssueService};
use wicket_core::issue::{FetchError, Issue, IssueFields};

struct StaticFetcher {
    result: Result<Issue, FetchError>,
}

#[async_trait]
impl IssueFetcher for StaticFetcher {
    async fn fetch_issue(&self, issue_id: &str) -> Result<Issue, FetchError> {
        if issue_id.is_empty() {
            return Err(FetchError::EmptyIssueId);
        }
        self.result.clone()
    }
}

struct SlowFetcher {
    delay: Duration,
}

#[async_trait]
impl IssueFetcher for SlowFetcher {
    async fn fetch_issue(&self, _issue_id: &str) -> Result<Issue, FetchError> {
        tokio::time::sleep(self.delay).await;
        Ok(Issue::default())
    }
}

fn sample_issue(key: &str) -> Issue {
    Issue {
        key: key.to_owned(),
        fields: IssueFields {
            summary: "A sample issue".to_owned(),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn forwards_fetcher_success() {
    let service = IssueService::new(Arc::new(StaticFetcher {
        result: Ok(sample_issue("TEST-123")),
    }));

    let issue = service.get_issue_details("TEST-123").await.unwrap();
    assert_eq!(issue, sample_issue("TEST-123"));
}

#[tokio::test]
async fn forwards_fetcher_errors_unchanged() {
    let service = IssueService::new(Arc::new(StaticFetcher {
        result: Err(FetchError::NotFound {
            issue_id: "TEST-404".to_owned(),
        }),
    }));

    assert_eq!(
        service.get_issue_details("TEST-404").await.unwrap_err(),
        FetchError::NotFound {
            issue_id: "TEST-404".to_owned()
        }
    );
}

#[tokio::test]
async fn deadline_expiry_is_a_transport_error() {
    let service = IssueService::with_deadline(
        Arc::new(SlowFetcher {
            delay: Duration::from_millis(200),
        }),
        Duration::from_millis(20),
    );

    let err = service.get_issue_details("TEST-1").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn empty_id_is_rejected_through_the_fetcher_guard() {
    let service = IssueService::new(Arc::new(StaticFetcher {
        result: Ok(sample_issue("TEST-1")),
    }));

    assert_eq!(
        service.get_issue_details("").await.unwrap_err(),
        FetchError::EmptyIssueId
    );
}
