//! terraform::taint
//!
//! The interactive resource-tainting flow.
//!
//! # Flow
//!
//! After `init`, `terraform show` is captured and mined for module and
//! resource names. The user picks a module, then a resource, repeating as
//! long as they answer yes to tainting more; a final confirmation gates
//! the actual `terraform taint module.<module>.<resource>` calls, run in
//! selection order. Declining the final confirmation dispatches nothing.
//!
//! The flow requires interactive mode; in quiet/non-interactive runs it
//! fails with a diagnostic rather than guessing.

use std::process::Command;

use anyhow::{bail, Context as _, Result};

use crate::core::environment;
use crate::core::{DeploymentContext, EnvSnapshot};
use crate::ui::output::{self, Verbosity};
use crate::ui::prompts;

/// Run the taint flow. Returns the exit code of the last taint command.
pub fn run(
    ctx: &DeploymentContext,
    _env: &EnvSnapshot,
    verbosity: Verbosity,
    interactive: bool,
) -> Result<i32> {
    if !interactive {
        bail!("taint requires an interactive session");
    }

    output::success("Running Terraform Resource Query", verbosity);
    let show = terraform_show(ctx)?;

    let mut selections: Vec<(String, String)> = Vec::new();
    loop {
        let modules = parse_modules(&show);
        if modules.is_empty() {
            bail!("no modules found in the current state");
        }
        let module_index = prompts::select(
            "Please choose the module you would like to taint:",
            &modules,
            interactive,
        )?;
        let module = &modules[module_index];

        let resources = parse_resources(&show, module);
        if resources.is_empty() {
            bail!("no resources found in module '{}'", module);
        }
        let resource_index = prompts::select(
            "Please choose the resource you would like to taint:",
            &resources,
            interactive,
        )?;
        selections.push((module.clone(), resources[resource_index].clone()));

        if !prompts::confirm("Select another module to taint?", false, interactive)? {
            break;
        }
    }

    println!("Tainting the following resources:");
    for (i, (module, resource)) in selections.iter().enumerate() {
        println!("[ {} ]: [ {} ] {}", i, module, resource);
    }

    if !prompts::confirm("Proceed with Taint?", false, interactive)? {
        return Ok(0);
    }

    output::success("Running Terraform Taint", verbosity);
    let mut code = 0;
    for (module, resource) in &selections {
        let address = format!("module.{}.{}", module, resource);
        let status = Command::new("terraform")
            .args(["taint", &address])
            .current_dir(&ctx.location)
            .envs(environment::overrides(ctx))
            .status()
            .context("failed to run terraform; is it installed and on PATH?")?;
        code = status.code().unwrap_or(1);
        if code != 0 {
            return Ok(code);
        }
    }
    Ok(code)
}

/// Capture `terraform show` output.
fn terraform_show(ctx: &DeploymentContext) -> Result<String> {
    let output = Command::new("terraform")
        .arg("show")
        .current_dir(&ctx.location)
        .envs(environment::overrides(ctx))
        .output()
        .context("failed to run terraform; is it installed and on PATH?")?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Module names: the second `.`-separated component of lines mentioning
/// `module`, with colons stripped, deduplicated in encounter order.
pub fn parse_modules(show: &str) -> Vec<String> {
    let mut modules = Vec::new();
    for line in show.lines() {
        if !line.contains("module") {
            continue;
        }
        let line = line.replace(':', "");
        let mut items = line.trim().split('.');
        if let (Some(_), Some(module)) = (items.next(), items.next()) {
            if !module.is_empty() && !modules.iter().any(|m| m == module) {
                modules.push(module.to_string());
            }
        }
    }
    modules
}

/// Resource names within `module`: the third `.`-separated component of
/// lines mentioning the module, deduplicated in encounter order.
pub fn parse_resources(show: &str, module: &str) -> Vec<String> {
    let mut resources = Vec::new();
    for line in show.lines() {
        if !line.contains(module) {
            continue;
        }
        let line = line.replace(':', "");
        let mut items = line.trim().split('.');
        if let (Some(_), Some(_), Some(resource)) = (items.next(), items.next(), items.next()) {
            if !resource.is_empty() && !resources.iter().any(|r| r == resource) {
                resources.push(resource.to_string());
            }
        }
    }
    resources
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW: &str = "\
# module.network.aws_vpc.main:
resource \"aws_vpc\" \"main\" {
}
# module.network.aws_subnet.private:
# module.compute.aws_instance.web:
";

    #[test]
    fn collects_unique_modules() {
        assert_eq!(parse_modules(SHOW), vec!["network", "compute"]);
    }

    #[test]
    fn collects_resources_for_module() {
        assert_eq!(parse_resources(SHOW, "network"), vec!["aws_vpc", "aws_subnet"]);
        assert_eq!(parse_resources(SHOW, "compute"), vec!["aws_instance"]);
    }

    #[test]
    fn empty_state_yields_nothing() {
        assert!(parse_modules("").is_empty());
        assert!(parse_resources("", "network").is_empty());
    }
}
