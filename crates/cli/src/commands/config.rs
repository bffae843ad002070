use anyhow::Result;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::commands::CommandContext;

const REDACTED: &str = "<redacted>";
const UNSET: &str = "<unset>";

pub fn run(ctx: &CommandContext) -> Result<String> {
    let config = &ctx.config;
    let token = if config.api.token.expose_secret().is_empty() { UNSET } else { REDACTED };

    if ctx.json {
        return Ok(serde_json::to_string_pretty(&json!({
            "api": {
                "base_url": config.api.base_url,
                "token": token,
                "timeout_secs": config.api.timeout_secs,
            },
            "identity": {
                "emp_number": config.identity.emp_number,
                "emp_name": config.identity.emp_name,
                "email": config.identity.email,
            },
            "logging": {
                "level": config.logging.level,
                "format": format!("{:?}", config.logging.format).to_lowercase(),
            },
        }))?);
    }

    Ok(format!(
        "api.base_url      = {}\n\
         api.token         = {}\n\
         api.timeout_secs  = {}\n\
         identity.emp_number = {}\n\
         identity.emp_name   = {}\n\
         identity.email      = {}\n\
         logging.level     = {}\n\
         logging.format    = {:?}",
        config.api.base_url,
        token,
        config.api.timeout_secs,
        config.identity.emp_number,
        config.identity.emp_name,
        config.identity.email,
        config.logging.level,
        config.logging.format,
    ))
}
