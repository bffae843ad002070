use anyhow::Result;

use deskflow_core::Employee;

use crate::commands::CommandContext;
use crate::output;

pub async fn run(
    ctx: &CommandContext,
    subject: &str,
    model: &str,
    for_emp: Option<String>,
    for_name: Option<String>,
    for_email: Option<String>,
) -> Result<String> {
    let creator = ctx.identity();
    let recipient = match for_emp {
        Some(emp_number) => Employee::new(
            emp_number,
            for_name.unwrap_or_default(),
            for_email.unwrap_or_default(),
        ),
        None => creator.clone(),
    };

    let orchestrator = ctx.orchestrator()?;
    let created = orchestrator.submit(&ctx.catalog, creator, recipient, subject, model).await?;

    if ctx.json {
        return Ok(serde_json::to_string_pretty(&created)?);
    }
    Ok(format!(
        "Request {} submitted for {} ({}).",
        created.request_id,
        created.created_for.emp_name,
        output::describe(&created),
    ))
}
