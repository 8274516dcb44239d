//! Inbound request model
//!
//! Wire types for the creation endpoint. Field names mirror the JSON
//! contract (camelCase). These types carry no AWS SDK dependencies; the
//! mapping onto provisioning request shapes lives in
//! [`crate::cluster::format`].

use std::collections::HashMap;

use serde::Deserialize;

/// A cluster creation request as received from the caller.
///
/// Role and zone fields may be empty; the orchestrator fills them from
/// configured defaults before submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationRequest {
    pub steps: Vec<Step>,
    #[serde(default)]
    pub service_role: String,
    #[serde(default)]
    pub job_flow_role: String,
    #[serde(default)]
    pub auto_scaling_role: String,
    #[serde(default)]
    pub hosted_zone_id: String,
    #[serde(default)]
    pub applications: Vec<String>,
    pub custom_instance_config: CustomInstanceConfig,
    #[serde(default)]
    pub custom_emr_configs: Vec<ExtraConfigBlock>,
}

/// One executable unit of work, run on the cluster in request order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub name: String,
    pub action_on_failure: FailureAction,
    pub jar_path: String,
}

/// What the cluster does when a step fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureAction {
    Continue,
    Terminate,
}

/// Caller customization of the instance layout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomInstanceConfig {
    /// Name of a registered [`InstanceTemplate`]
    pub instance_template: String,
    /// Spot pricing for every instance group instead of on-demand
    pub use_spot_pricing: bool,
    pub ec2_subnet_id: String,
    /// Keep the cluster alive once all steps have finished
    pub keep_alive_post_job: bool,
}

/// A configuration block passed through verbatim to the cluster
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraConfigBlock {
    pub classification: String,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Role a group of instances plays within the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRole {
    Master,
    Core,
}

/// One instance group within a template
#[derive(Debug, Clone)]
pub struct InstanceGroupSpec {
    pub role: GroupRole,
    pub instance_type: &'static str,
    pub count: i32,
}

/// Named, predefined instance group shapes used as the base for
/// customization. Data only; looked up by name, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "UPPERCASE")]
pub enum InstanceTemplate {
    Small,
    Large,
}

impl InstanceTemplate {
    /// The instance groups this template starts from
    pub fn instance_groups(&self) -> Vec<InstanceGroupSpec> {
        match self {
            InstanceTemplate::Small => vec![
                InstanceGroupSpec {
                    role: GroupRole::Master,
                    instance_type: "m5.xlarge",
                    count: 1,
                },
                InstanceGroupSpec {
                    role: GroupRole::Core,
                    instance_type: "m5.xlarge",
                    count: 2,
                },
            ],
            InstanceTemplate::Large => vec![
                InstanceGroupSpec {
                    role: GroupRole::Master,
                    instance_type: "m5.2xlarge",
                    count: 1,
                },
                InstanceGroupSpec {
                    role: GroupRole::Core,
                    instance_type: "m5.2xlarge",
                    count: 8,
                },
            ],
        }
    }
}
