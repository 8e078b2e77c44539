//! core::environment
//!
//! Exported process-environment overrides.
//!
//! # Design
//!
//! The exporter is pure: it returns the ordered override list derived from
//! a resolved [`DeploymentContext`]. The dispatcher layers these on top of
//! the inherited process environment when spawning Terraform. Each key is
//! set exactly once.

use crate::core::context::DeploymentContext;

/// Build the environment overrides for the Terraform subprocess.
pub fn overrides(ctx: &DeploymentContext) -> Vec<(String, String)> {
    let set = |key: &str, value: &str| (key.to_string(), value.to_string());
    vec![
        set("TF_VAR_deployment_region", &ctx.region),
        set("TF_VAR_backend_region", &ctx.backend_region),
        set("TF_VAR_project", &ctx.project),
        set("TF_VAR_account", &ctx.account),
        set("TF_VAR_mode", ctx.declaration.mode.as_deref().unwrap_or("")),
        set("TF_VAR_env", &ctx.environment),
        set("TF_VAR_site", &ctx.site),
        set("TF_VAR_azrsa", &ctx.bucket),
        set("TF_VAR_bucket", &ctx.bucket),
        set("TF_VAR_prefix", &ctx.prefix),
        set(
            "TF_VAR_china_deployment",
            ctx.declaration.china_deployment.as_deref().unwrap_or(""),
        ),
        set("TF_CLI_ARGS", &ctx.tf_cli_args),
        set("AWS_REGION", &ctx.region),
        set("AZR_REGION", &ctx.region),
        set("REPO_PATH", &ctx.repo_root.to_string_lossy()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::declaration::Declaration;
    use crate::core::envfiles::EnvFiles;
    use crate::core::naming::Cloud;
    use std::path::PathBuf;

    fn context() -> DeploymentContext {
        DeploymentContext {
            platform: "linux".to_string(),
            location: PathBuf::from("/repo/vpc"),
            repo_root: PathBuf::from("/repo"),
            repo_url: "git@example.com:org/aws-proj.git".to_string(),
            repo_name: "aws-proj".to_string(),
            branch_name: "acct-dev".to_string(),
            cloud: Cloud::Aws,
            project: "proj".to_string(),
            account: "acct".to_string(),
            environment: "dev".to_string(),
            site: String::new(),
            resource: "vpc".to_string(),
            secret_path: PathBuf::from("/repo/secret_aws_backend.tfvars"),
            env_files: EnvFiles {
                declaration: PathBuf::from("/repo/common/environments/env_dev.hcl"),
                common_vars: PathBuf::from("/repo/common/environments/env_dev_common.tfvars"),
                local_vars: PathBuf::from("/repo/vpc/environments/env_dev.tfvars"),
            },
            declaration: Declaration {
                mode: Some("true".to_string()),
                china_deployment: Some("false".to_string()),
                ..Declaration::default()
            },
            region: "us-east-1".to_string(),
            tf_cli_args: "-no-color".to_string(),
            bucket_prefix: "inf.tfstate".to_string(),
            build_id: None,
            prefix: "proj-true".to_string(),
            module: "vpc-true".to_string(),
            bucket: "inf.tfstate.acct.dev".to_string(),
            bucket_key: "proj-true/us-east-1/vpc-true/terraform.tfstate".to_string(),
            backend_region: "us-east-1".to_string(),
            tf_cloud_org: None,
            var_files: vec![PathBuf::from("/repo/vpc/environments/env_dev.tfvars")],
            missing_common_vars: None,
        }
    }

    #[test]
    fn exports_the_full_variable_set() {
        let ctx = context();
        let env = overrides(&ctx);
        let get = |key: &str| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };

        assert_eq!(get("TF_VAR_deployment_region"), "us-east-1");
        assert_eq!(get("TF_VAR_backend_region"), "us-east-1");
        assert_eq!(get("TF_VAR_project"), "proj");
        assert_eq!(get("TF_VAR_account"), "acct");
        assert_eq!(get("TF_VAR_mode"), "true");
        assert_eq!(get("TF_VAR_env"), "dev");
        assert_eq!(get("TF_VAR_site"), "");
        assert_eq!(get("TF_VAR_azrsa"), "inf.tfstate.acct.dev");
        assert_eq!(get("TF_VAR_bucket"), "inf.tfstate.acct.dev");
        assert_eq!(get("TF_VAR_prefix"), "proj-true");
        assert_eq!(get("TF_VAR_china_deployment"), "false");
        assert_eq!(get("TF_CLI_ARGS"), "-no-color");
        assert_eq!(get("AWS_REGION"), "us-east-1");
        assert_eq!(get("AZR_REGION"), "us-east-1");
        assert_eq!(get("REPO_PATH"), "/repo");
    }

    #[test]
    fn each_key_is_set_once() {
        let env = overrides(&context());
        let mut keys: Vec<_> = env.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), env.len());
    }

    #[test]
    fn absent_flags_export_empty_strings() {
        let mut ctx = context();
        ctx.declaration = Declaration::default();
        ctx.tf_cli_args = String::new();
        let env = overrides(&ctx);
        let get = |key: &str| {
            env.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("TF_VAR_mode"), "");
        assert_eq!(get("TF_VAR_china_deployment"), "");
        assert_eq!(get("TF_CLI_ARGS"), "");
    }
}
