use anyhow::{bail, Result};
use serde::Serialize;

use deskflow_client::WorkflowApi;
use deskflow_core::LaptopRequest;
use deskflow_workflow::DecisionOutcome;

use crate::commands::CommandContext;
use crate::output;

#[derive(Serialize)]
struct DecisionReport {
    outcome: DecisionOutcome,
    queue: Vec<LaptopRequest>,
}

pub async fn run(
    ctx: &CommandContext,
    task_id: &str,
    approve: bool,
    reject: bool,
    remarks: &str,
) -> Result<String> {
    if approve == reject {
        bail!("pass exactly one of --approve or --reject");
    }

    let emp_number = ctx.config.identity.emp_number.clone();
    let client = ctx.client()?;
    let orchestrator = ctx.orchestrator()?;

    let assigned = client.list_assigned(&emp_number).await?;
    let Some(request) = assigned.iter().find(|r| r.task_id.as_deref() == Some(task_id)) else {
        bail!("task `{task_id}` is not in your queue (see `deskflow queue`)");
    };

    let outcome = orchestrator.decide(request, approve, remarks).await?;

    // The orchestrator signals one refetch of the assigned collection
    // after a successful decision; render the refreshed queue.
    let mut queue = client.list_assigned(&emp_number).await?;
    queue.sort_by(|a, b| b.created_date.cmp(&a.created_date));

    if ctx.json {
        return Ok(serde_json::to_string_pretty(&DecisionReport { outcome, queue })?);
    }

    let verdict = if outcome.approved { "approved" } else { "rejected" };
    let mut rendered = format!(
        "Task {} {} (remarks: {}).\n\nRemaining queue:\n",
        outcome.task_id, verdict, outcome.remarks_sent
    );
    rendered.push_str(&output::render_table(&queue));
    Ok(rendered)
}
