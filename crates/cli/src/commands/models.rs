use anyhow::Result;

use crate::commands::CommandContext;

pub fn run(ctx: &CommandContext) -> Result<String> {
    if ctx.json {
        let models: Vec<_> = ctx.catalog.iter().collect();
        return Ok(serde_json::to_string_pretty(&models)?);
    }

    let width =
        ctx.catalog.iter().map(|model| model.name.len()).max().unwrap_or(0);
    let mut rendered = String::new();
    for model in ctx.catalog.iter() {
        rendered.push_str(&format!("{:width$}  {}\n", model.name, model.description));
    }
    Ok(rendered.trim_end().to_owned())
}
