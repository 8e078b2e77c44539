//! core::backend
//!
//! The per-cloud backend decision table.
//!
//! # Design
//!
//! Given the resolved deployment coordinates and declaration flags, this
//! module produces the backend configuration (`bucket`, `bucket_key`,
//! `backend_region`) plus the `prefix`/`module` naming pair, as pure string
//! construction. The one side effect on the Terraform Cloud path (ensuring
//! the remote workspace and writing the local backend-config file) happens
//! at dispatch time, keyed off the values computed here.
//!
//! # Conventions Encoded
//!
//! - AWS state buckets are `<prefix>.<account>.<environment>[.dr]`, keys are
//!   sharded by region unless the resource is account-global (flagged, or a
//!   Route53-style resource whose path contains `53`)
//! - AWS backend regions map through the DR/China table
//! - Azure storage accounts are the same triple with no separators; the
//!   declaration region is used verbatim as the backend region (the DR/China
//!   table is intentionally not applied here)
//! - Unknown clouds with `tf_cloud_backend = "true"` use a Terraform Cloud
//!   workspace named `<environment>-<prefix>-<module>` with `/` flattened
//!   to `-`
//! - Everything else signals a local-only backend with the `"none"` sentinel

use crate::core::declaration::Declaration;
use crate::core::naming::Cloud;

/// Sentinel for fields that do not apply to the selected backend.
pub const NONE_SENTINEL: &str = "none";

/// Inputs to the decision table.
#[derive(Debug)]
pub struct BackendInputs<'a> {
    pub cloud: &'a Cloud,
    pub project: &'a str,
    pub account: &'a str,
    pub environment: &'a str,
    /// Optional target site (e.g. `dr`).
    pub site: Option<&'a str>,
    /// Working directory relative to the repo root, `/`-normalized.
    pub resource: &'a str,
    /// Deployment region from the declaration file (may be empty).
    pub region: &'a str,
    /// State bucket prefix from user configuration.
    pub bucket_prefix: &'a str,
    pub declaration: &'a Declaration,
    /// Terraform Cloud organization override (env/user config).
    pub tf_cloud_org_override: Option<&'a str>,
}

/// Output of the decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Site field for export; empty when no site is selected.
    pub site: String,
    pub prefix: String,
    pub module: String,
    pub bucket: String,
    pub bucket_key: String,
    pub backend_region: String,
    /// Organization for the Terraform Cloud workspace backend, when selected.
    pub tf_cloud_org: Option<String>,
}

impl BackendConfig {
    /// Whether the decision table selected the Terraform Cloud workspace backend.
    pub fn uses_tf_cloud_workspace(&self) -> bool {
        self.tf_cloud_org.is_some()
    }
}

/// Run the decision table.
pub fn build(inputs: &BackendInputs<'_>) -> BackendConfig {
    let (site, prefix, module) = prefix_and_module(inputs);

    match inputs.cloud {
        Cloud::Aws => aws(inputs, site, prefix, module),
        Cloud::Azr => azr(inputs, site, prefix, module),
        Cloud::Vmw | Cloud::Other(_) if inputs.declaration.tf_cloud_enabled() => {
            tf_cloud(inputs, site, prefix, module)
        }
        _ => local_only(site, prefix, module),
    }
}

/// Step 1: prefix/module naming.
///
/// The mode suffix is the literal flag value (i.e. the string `true`),
/// matching the observed convention.
fn prefix_and_module(inputs: &BackendInputs<'_>) -> (String, String, String) {
    let mode = inputs.declaration.mode.as_deref().unwrap_or("");
    match (inputs.site, inputs.declaration.mode_enabled()) {
        (Some(site), true) => (
            site.to_string(),
            format!("{}-{}-{}", inputs.project, site, mode),
            format!("{}-{}", inputs.resource, mode),
        ),
        (Some(site), false) => (
            site.to_string(),
            format!("{}-{}", inputs.project, site),
            inputs.resource.to_string(),
        ),
        (None, true) => (
            String::new(),
            format!("{}-{}", inputs.project, mode),
            format!("{}-{}", inputs.resource, mode),
        ),
        (None, false) => (
            String::new(),
            inputs.project.to_string(),
            inputs.resource.to_string(),
        ),
    }
}

fn aws(inputs: &BackendInputs<'_>, site: String, prefix: String, module: String) -> BackendConfig {
    // Account-global resources (and Route53-style ones) are not region-sharded.
    let bucket_key =
        if inputs.declaration.global_resource_enabled() || inputs.resource.contains("53") {
            format!("{}/{}/terraform.tfstate", prefix, module)
        } else {
            format!("{}/{}/{}/terraform.tfstate", prefix, inputs.region, module)
        };

    let china = inputs.declaration.china_enabled();
    let (bucket, backend_region) = if inputs.declaration.dr_enabled() {
        (
            format!(
                "{}.{}.{}.dr",
                inputs.bucket_prefix, inputs.account, inputs.environment
            ),
            if china { "cn-northwest-1" } else { "us-west-2" },
        )
    } else {
        (
            format!(
                "{}.{}.{}",
                inputs.bucket_prefix, inputs.account, inputs.environment
            ),
            if china { "cn-north-1" } else { "us-east-1" },
        )
    };

    BackendConfig {
        site,
        prefix,
        module,
        bucket,
        bucket_key,
        backend_region: backend_region.to_string(),
        tf_cloud_org: None,
    }
}

fn azr(inputs: &BackendInputs<'_>, site: String, prefix: String, module: String) -> BackendConfig {
    let bucket_key = format!(
        "{}/{}/{}/{}/terraform.tfstate",
        inputs.environment, prefix, inputs.region, module
    );

    // Storage account names allow no separators.
    let bucket = if inputs.declaration.dr_enabled() {
        format!(
            "{}{}{}dr",
            inputs.bucket_prefix, inputs.account, inputs.environment
        )
    } else {
        format!(
            "{}{}{}",
            inputs.bucket_prefix, inputs.account, inputs.environment
        )
    };

    BackendConfig {
        site,
        prefix,
        module,
        bucket,
        bucket_key,
        backend_region: inputs.region.to_string(),
        tf_cloud_org: None,
    }
}

fn tf_cloud(
    inputs: &BackendInputs<'_>,
    site: String,
    prefix: String,
    module: String,
) -> BackendConfig {
    // Workspace names cannot contain '/'.
    let bucket_key = format!(
        "{}-{}-{}",
        inputs.environment,
        prefix.replace('/', "-"),
        module.replace('/', "-")
    );

    let tf_cloud_org = inputs
        .tf_cloud_org_override
        .map(str::to_string)
        .or_else(|| inputs.declaration.tf_cloud_org.clone());

    BackendConfig {
        site,
        prefix,
        module,
        bucket: NONE_SENTINEL.to_string(),
        bucket_key,
        backend_region: NONE_SENTINEL.to_string(),
        tf_cloud_org: Some(tf_cloud_org.unwrap_or_default()),
    }
}

fn local_only(site: String, prefix: String, module: String) -> BackendConfig {
    BackendConfig {
        site,
        prefix,
        module,
        bucket: NONE_SENTINEL.to_string(),
        bucket_key: NONE_SENTINEL.to_string(),
        backend_region: NONE_SENTINEL.to_string(),
        tf_cloud_org: None,
    }
}
