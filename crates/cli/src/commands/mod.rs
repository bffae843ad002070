pub mod config;
pub mod decide;
pub mod listing;
pub mod models;
pub mod submit;

use std::sync::Arc;

use anyhow::{Context, Result};

use deskflow_client::HttpWorkflowClient;
use deskflow_core::config::AppConfig;
use deskflow_core::{Employee, ModelCatalog};
use deskflow_workflow::ApprovalOrchestrator;

use crate::{Cli, Command};

/// Shared state handed to every command: effective configuration plus
/// the output mode.
pub struct CommandContext {
    pub config: AppConfig,
    pub json: bool,
    pub catalog: ModelCatalog,
}

impl CommandContext {
    /// The acting employee from configuration. Identity is an external
    /// concern; the CLI only carries it into the workflow calls.
    pub fn identity(&self) -> Employee {
        Employee::new(
            self.config.identity.emp_number.clone(),
            self.config.identity.emp_name.clone(),
            self.config.identity.email.clone(),
        )
    }

    pub fn client(&self) -> Result<Arc<HttpWorkflowClient>> {
        let client = HttpWorkflowClient::new(&self.config.api)
            .context("could not construct workflow client")?;
        Ok(Arc::new(client))
    }

    pub fn orchestrator(&self) -> Result<ApprovalOrchestrator<HttpWorkflowClient>> {
        Ok(ApprovalOrchestrator::new(self.client()?))
    }
}

pub async fn dispatch(cli: Cli, config: AppConfig) -> Result<String> {
    let ctx = CommandContext { config, json: cli.json, catalog: ModelCatalog::default() };

    match cli.command {
        Command::Submit { subject, model, for_emp, for_name, for_email } => {
            submit::run(&ctx, &subject, &model, for_emp, for_name, for_email).await
        }
        Command::CreatedBy { emp } => listing::run(&ctx, listing::Scope::CreatedBy, emp).await,
        Command::CreatedFor { emp } => listing::run(&ctx, listing::Scope::CreatedFor, emp).await,
        Command::Queue { emp } => listing::run(&ctx, listing::Scope::Assigned, emp).await,
        Command::Decide { task_id, approve, reject, remarks } => {
            decide::run(&ctx, &task_id, approve, reject, &remarks).await
        }
        Command::Models => models::run(&ctx),
        Command::Config => config::run(&ctx),
    }
}
