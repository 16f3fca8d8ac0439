//! Decoding of GitHub webhook payloads into [`Event`]s
//!
//! Deliveries arrive already signature-verified from the transport layer.
//! Only the fields the state machine needs are modelled; everything else in
//! the payload is ignored.

use super::{CheckEvent, Event, PullRequestAction, PullRequestEvent, ReviewEvent};
use crate::error::{Error, Result};
use crate::types::{CheckState, PrId, RepoRef};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// A relayed webhook delivery: the `X-GitHub-Event` name plus the JSON body
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    /// Event name (`pull_request`, `pull_request_review`, `status`, `check_run`, ...)
    pub event: String,
    /// Decoded JSON body
    pub payload: serde_json::Value,
}

impl Delivery {
    /// Parse one JSON line of the relay stream
    pub fn from_json_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Decode into an event. `Ok(None)` for deliveries the core ignores.
    pub fn into_event(self) -> Result<Option<Event>> {
        parse_delivery(&self.event, self.payload)
    }
}

#[derive(Deserialize)]
struct HeadPayload {
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    url: String,
    head: HeadPayload,
}

#[derive(Deserialize)]
struct OwnerPayload {
    login: String,
}

#[derive(Deserialize)]
struct RepositoryPayload {
    name: String,
    owner: OwnerPayload,
}

impl From<RepositoryPayload> for RepoRef {
    fn from(repo: RepositoryPayload) -> Self {
        Self::new(repo.owner.login, repo.name)
    }
}

#[derive(Deserialize)]
struct ReviewPayload {
    id: u64,
    state: String,
}

#[derive(Deserialize)]
struct PullRequestReviewHook {
    action: String,
    review: ReviewPayload,
    pull_request: PullRequestPayload,
}

#[derive(Deserialize)]
struct PullRequestHook {
    action: String,
    pull_request: PullRequestPayload,
}

#[derive(Deserialize)]
struct StatusHook {
    sha: String,
    context: String,
    state: String,
    repository: RepositoryPayload,
}

#[derive(Deserialize)]
struct CheckRunPullRequest {
    url: String,
}

#[derive(Deserialize)]
struct CheckRunPayload {
    head_sha: String,
    name: String,
    status: String,
    conclusion: Option<String>,
    #[serde(default)]
    pull_requests: Vec<CheckRunPullRequest>,
}

#[derive(Deserialize)]
struct CheckRunHook {
    check_run: CheckRunPayload,
    repository: RepositoryPayload,
}

fn decode<T: DeserializeOwned>(event: &str, payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::Payload(format!("{event}: {e}")))
}

/// Decode a webhook delivery into an [`Event`].
///
/// Returns `Ok(None)` for event kinds and actions that carry no readiness
/// evidence (pings, edited reviews, ...).
pub fn parse_delivery(event: &str, payload: serde_json::Value) -> Result<Option<Event>> {
    match event {
        "pull_request_review" => {
            let hook: PullRequestReviewHook = decode(event, payload)?;
            if !matches!(hook.action.as_str(), "submitted" | "dismissed") {
                debug!(action = %hook.action, "ignoring review action");
                return Ok(None);
            }
            Ok(Some(Event::Review(ReviewEvent {
                pr: PrId::from_api_url(&hook.pull_request.url)?,
                head_sha: hook.pull_request.head.sha,
                head_ref: hook.pull_request.head.ref_name,
                review_id: hook.review.id,
                state: hook.review.state,
            })))
        }
        "pull_request" => {
            let hook: PullRequestHook = decode(event, payload)?;
            let action = if hook.action == "closed" {
                PullRequestAction::Closed
            } else {
                PullRequestAction::Updated
            };
            Ok(Some(Event::PullRequest(PullRequestEvent {
                pr: PrId::from_api_url(&hook.pull_request.url)?,
                head_sha: hook.pull_request.head.sha,
                head_ref: hook.pull_request.head.ref_name,
                action,
            })))
        }
        "status" => {
            let hook: StatusHook = decode(event, payload)?;
            Ok(Some(Event::Check(CheckEvent {
                repo: hook.repository.into(),
                commit: hook.sha,
                context: hook.context,
                state: CheckState::from_status(&hook.state),
                pr: None,
            })))
        }
        "check_run" => {
            let hook: CheckRunHook = decode(event, payload)?;
            let run = hook.check_run;
            let pr = run
                .pull_requests
                .iter()
                .find_map(|p| PrId::from_api_url(&p.url).ok());
            Ok(Some(Event::Check(CheckEvent {
                repo: hook.repository.into(),
                commit: run.head_sha,
                context: run.name,
                state: CheckState::from_check_run(&run.status, run.conclusion.as_deref()),
                pr,
            })))
        }
        other => {
            debug!(event = other, "ignoring webhook event");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PR_URL: &str = "https://api.github.com/repos/dgmltn/api-test/pulls/5";

    fn pull_request_json(sha: &str) -> serde_json::Value {
        json!({
            "url": PR_URL,
            "number": 5,
            "head": { "sha": sha, "ref": "my-pull-request", "label": "dgmltn:my-pull-request" },
            "base": { "sha": "base000", "ref": "main" }
        })
    }

    fn repository_json() -> serde_json::Value {
        json!({
            "name": "api-test",
            "full_name": "dgmltn/api-test",
            "owner": { "login": "dgmltn", "id": 1 }
        })
    }

    #[test]
    fn test_review_submitted() {
        let payload = json!({
            "action": "submitted",
            "review": { "id": 80, "state": "APPROVED", "body": null },
            "pull_request": pull_request_json("abcd1234"),
            "repository": repository_json(),
        });

        let event = parse_delivery("pull_request_review", payload).unwrap();
        assert_eq!(
            event,
            Some(Event::Review(ReviewEvent {
                pr: PrId::new("dgmltn", "api-test", 5),
                head_sha: "abcd1234".to_string(),
                head_ref: "my-pull-request".to_string(),
                review_id: 80,
                state: "APPROVED".to_string(),
            }))
        );
    }

    #[test]
    fn test_review_edited_is_ignored() {
        let payload = json!({
            "action": "edited",
            "review": { "id": 80, "state": "approved" },
            "pull_request": pull_request_json("abcd1234"),
        });
        assert_eq!(parse_delivery("pull_request_review", payload).unwrap(), None);
    }

    #[test]
    fn test_pull_request_actions() {
        let opened = json!({ "action": "synchronize", "pull_request": pull_request_json("beef") });
        let Some(Event::PullRequest(event)) = parse_delivery("pull_request", opened).unwrap()
        else {
            panic!("expected pull request event");
        };
        assert_eq!(event.action, PullRequestAction::Updated);
        assert_eq!(event.head_sha, "beef");

        let closed = json!({ "action": "closed", "pull_request": pull_request_json("beef") });
        let Some(Event::PullRequest(event)) = parse_delivery("pull_request", closed).unwrap()
        else {
            panic!("expected pull request event");
        };
        assert_eq!(event.action, PullRequestAction::Closed);
    }

    #[test]
    fn test_status() {
        let payload = json!({
            "sha": "abcd1234",
            "context": "ci/circleci",
            "state": "error",
            "repository": repository_json(),
        });

        let event = parse_delivery("status", payload).unwrap();
        assert_eq!(
            event,
            Some(Event::Check(CheckEvent {
                repo: RepoRef::new("dgmltn", "api-test"),
                commit: "abcd1234".to_string(),
                context: "ci/circleci".to_string(),
                state: CheckState::Failure,
                pr: None,
            }))
        );
    }

    #[test]
    fn test_check_run_names_pr() {
        let payload = json!({
            "action": "completed",
            "check_run": {
                "head_sha": "abcd1234",
                "name": "build",
                "status": "completed",
                "conclusion": "success",
                "pull_requests": [{ "url": PR_URL, "number": 5 }],
            },
            "repository": repository_json(),
        });

        let Some(Event::Check(check)) = parse_delivery("check_run", payload).unwrap() else {
            panic!("expected check event");
        };
        assert_eq!(check.state, CheckState::Success);
        assert_eq!(check.context, "build");
        assert_eq!(check.pr, Some(PrId::new("dgmltn", "api-test", 5)));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        assert_eq!(parse_delivery("ping", json!({ "zen": "hi" })).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let result = parse_delivery("status", json!({ "sha": 12 }));
        assert!(matches!(result, Err(Error::Payload(_))));
    }

    #[test]
    fn test_delivery_line() {
        let line = r#"{"event":"status","payload":{"sha":"a1","context":"ci","state":"pending","repository":{"name":"r","owner":{"login":"o"}}}}"#;
        let event = Delivery::from_json_line(line).unwrap().into_event().unwrap();
        let Some(Event::Check(check)) = event else {
            panic!("expected check event");
        };
        assert_eq!(check.state, CheckState::Pending);
        assert_eq!(check.repo, RepoRef::new("o", "r"));
    }
}
