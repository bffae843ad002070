use anyhow::Result;

use deskflow_client::WorkflowApi;

use crate::commands::CommandContext;
use crate::output;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    CreatedBy,
    CreatedFor,
    Assigned,
}

pub async fn run(ctx: &CommandContext, scope: Scope, emp: Option<String>) -> Result<String> {
    let emp_number = emp.unwrap_or_else(|| ctx.config.identity.emp_number.clone());
    let client = ctx.client()?;

    let mut requests = match scope {
        Scope::CreatedBy => client.list_by_creator(&emp_number).await?,
        Scope::CreatedFor => client.list_by_recipient(&emp_number).await?,
        Scope::Assigned => client.list_assigned(&emp_number).await?,
    };
    // The engine returns lists unordered; newest first reads best.
    requests.sort_by(|a, b| b.created_date.cmp(&a.created_date));

    if ctx.json {
        return Ok(serde_json::to_string_pretty(&requests)?);
    }
    Ok(output::render_table(&requests))
}
