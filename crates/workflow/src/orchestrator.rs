use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use deskflow_client::{ClientError, CompletionCall, WorkflowApi};
use deskflow_core::{
    CreationPayload, Employee, LaptopRequest, ModelCatalog, RequestState, ValidationError,
};

/// Remarks transmitted for an approval when the approver left the field
/// empty.
pub const APPROVAL_REMARKS: &str = "Approved";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("request has no task id; it has not reached an approver")]
    MissingTaskId,
    #[error("request has no assignee; it has not reached an approver")]
    MissingAssignee,
    #[error("request is not awaiting a decision (current state: {state})")]
    NotDecidable { state: RequestState },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("a decision for task `{task_id}` is already in flight")]
    ConcurrentAction { task_id: String },
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Which caller-owned collection a successful mutation invalidates. The
/// orchestrator holds no cache of its own; it tells the caller what to
/// refetch, exactly once, and never retries on its behalf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTarget {
    AssignedRequests,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DecisionOutcome {
    pub task_id: String,
    pub approved: bool,
    /// Remarks as actually transmitted, after the approval default was
    /// applied.
    pub remarks_sent: String,
    pub refresh: RefreshTarget,
    pub correlation_id: Uuid,
}

/// Coordinates approve/reject decisions and request submission against
/// a [`WorkflowApi`]. Failures leave no local state behind: the caller
/// must treat the request as unchanged until a refetch says otherwise.
pub struct ApprovalOrchestrator<C> {
    client: Arc<C>,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl<C> ApprovalOrchestrator<C>
where
    C: WorkflowApi,
{
    pub fn new(client: Arc<C>) -> Self {
        Self { client, in_flight: Arc::new(Mutex::new(HashSet::new())) }
    }

    /// Validates and submits a new laptop request. Validation failures
    /// surface before any network call, so the caller's form state is
    /// still intact for correction.
    pub async fn submit(
        &self,
        catalog: &ModelCatalog,
        creator: Employee,
        recipient: Employee,
        subject: &str,
        model: &str,
    ) -> Result<LaptopRequest, ActionError> {
        let payload = CreationPayload::build(catalog, creator, recipient, subject, model)?;

        let correlation_id = Uuid::new_v4();
        info!(
            event_name = "workflow.request_submitted",
            model = %model,
            correlation_id = %correlation_id,
            "submitting laptop request"
        );
        let created = self.client.start(&payload).await?;
        info!(
            event_name = "workflow.request_created",
            request_id = %created.request_id,
            correlation_id = %correlation_id,
            "workflow engine accepted request"
        );
        Ok(created)
    }

    /// Executes an approve/reject decision with exactly one completion
    /// call and a deterministic refresh contract.
    ///
    /// Preconditions (checked before anything touches the network):
    /// the request carries a `task_id` and `assignee` and is in a
    /// decidable state; a rejection carries non-empty remarks. An empty
    /// approval remark transmits the literal `"Approved"`.
    ///
    /// At most one decision per task id may be in flight; a concurrent
    /// second call fails with [`ActionError::ConcurrentAction`]. The
    /// slot is released when this future resolves or is dropped, so an
    /// abandoned caller never wedges the task.
    pub async fn decide(
        &self,
        request: &LaptopRequest,
        approve: bool,
        remarks: &str,
    ) -> Result<DecisionOutcome, ActionError> {
        let task_id =
            request.task_id.clone().ok_or(PreconditionError::MissingTaskId)?;
        let assignee =
            request.assignee.clone().ok_or(PreconditionError::MissingAssignee)?;

        let state = RequestState::of(&request.request_status);
        if !state.is_decidable() {
            return Err(PreconditionError::NotDecidable { state }.into());
        }

        let remarks = remarks.trim();
        let remarks_sent = if approve {
            if remarks.is_empty() { APPROVAL_REMARKS.to_owned() } else { remarks.to_owned() }
        } else if remarks.is_empty() {
            return Err(ValidationError::RemarksRequired.into());
        } else {
            remarks.to_owned()
        };

        let _slot = InFlightSlot::acquire(&self.in_flight, &task_id)?;

        let correlation_id = Uuid::new_v4();
        info!(
            event_name = "workflow.decision_submitted",
            task_id = %task_id,
            approve,
            correlation_id = %correlation_id,
            "completing approver task"
        );

        let call = CompletionCall {
            task_id: task_id.clone(),
            approver_id: assignee,
            approve,
            remarks: remarks_sent.clone(),
            user_process_request_id: request.user_process_request_id.clone(),
        };

        match self.client.complete(&call).await {
            Ok(()) => {
                info!(
                    event_name = "workflow.decision_applied",
                    task_id = %task_id,
                    approve,
                    correlation_id = %correlation_id,
                    "workflow engine accepted decision"
                );
                Ok(DecisionOutcome {
                    task_id,
                    approved: approve,
                    remarks_sent,
                    refresh: RefreshTarget::AssignedRequests,
                    correlation_id,
                })
            }
            Err(error) => {
                warn!(
                    event_name = "workflow.decision_failed",
                    task_id = %task_id,
                    error = %error,
                    correlation_id = %correlation_id,
                    "workflow engine rejected decision"
                );
                Err(error.into())
            }
        }
    }
}

/// RAII registration of an in-flight decision. Removal happens on drop,
/// which covers success, failure, and an abandoned future alike.
struct InFlightSlot {
    slots: Arc<Mutex<HashSet<String>>>,
    task_id: String,
}

impl InFlightSlot {
    fn acquire(
        slots: &Arc<Mutex<HashSet<String>>>,
        task_id: &str,
    ) -> Result<Self, ActionError> {
        let mut guard = slots.lock().expect("in-flight set poisoned");
        if !guard.insert(task_id.to_owned()) {
            return Err(ActionError::ConcurrentAction { task_id: task_id.to_owned() });
        }
        Ok(Self { slots: Arc::clone(slots), task_id: task_id.to_owned() })
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.slots.lock() {
            guard.remove(&self.task_id);
        }
    }
}
