use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use deskflow_core::{CreationPayload, LaptopRequest};

/// Failure classes for any remote call. The core never retries these;
/// retry policy belongs to the caller, since blindly resubmitting a
/// decision risks duplicates.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("network failure talking to the workflow engine: {0}")]
    Network(String),
    #[error("workflow engine rejected the credential (status {status})")]
    Auth { status: u16 },
    #[error("workflow engine returned status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("could not decode workflow engine response: {0}")]
    Decode(String),
}

/// Body for `POST /process/{taskId}/complete`. The task id rides in the
/// path, not the body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompletionCall {
    #[serde(skip)]
    pub task_id: String,
    #[serde(rename = "approverId")]
    pub approver_id: String,
    pub approve: bool,
    pub remarks: String,
    #[serde(rename = "userProcessRequestId", skip_serializing_if = "Option::is_none")]
    pub user_process_request_id: Option<String>,
}

/// Contract toward the external process engine. List results are
/// unordered; callers sort. `complete` reports success or failure only,
/// with no partial-success semantics.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Starts a new request; the engine assigns and returns the
    /// `request_id`.
    async fn start(&self, payload: &CreationPayload) -> Result<LaptopRequest, ClientError>;

    async fn list_by_creator(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError>;

    async fn list_by_recipient(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError>;

    /// Requests currently awaiting the employee's decision.
    async fn list_assigned(&self, emp_number: &str) -> Result<Vec<LaptopRequest>, ClientError>;

    async fn complete(&self, call: &CompletionCall) -> Result<(), ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_body_excludes_task_id() {
        let call = CompletionCall {
            task_id: "T1".to_owned(),
            approver_id: "EMP1".to_owned(),
            approve: true,
            remarks: "Approved".to_owned(),
            user_process_request_id: Some("UPR-9".to_owned()),
        };

        let value = serde_json::to_value(&call).expect("serialize");
        assert!(value.get("task_id").is_none());
        assert!(value.get("taskId").is_none());
        assert_eq!(value["approverId"], "EMP1");
        assert_eq!(value["approve"], true);
        assert_eq!(value["remarks"], "Approved");
        assert_eq!(value["userProcessRequestId"], "UPR-9");
    }
}
