//! route 命令：打印检测到的路由事实

use super::CommandContext;
use crate::error::Result;
use crate::types::OutputFormat;

pub fn show(ctx: &CommandContext, domain: &str, format: OutputFormat) -> Result<i32> {
    let route = ctx.routes().resolve(domain)?;
    match format {
        OutputFormat::Env => {
            println!("CONTAINER={}", route.container_name);
            println!("DOCUMENT_ROOT={}", route.document_root);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&route)?),
    }
    Ok(0)
}
