//! EMR provisioning client

mod operations;
mod types;

pub use operations::EmrOperations;
pub use types::{
    ClusterView, InstantView, JobFlowSpec, StateChangeReasonView, StatusView, TimelineView,
};

#[cfg(test)]
pub use operations::MockEmrOperations;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_emr::types::{Application, RepoUpgradeOnBoot, Tag};
use tracing::{debug, info};

use crate::aws::context::AwsContext;

/// Tag recorded on every broker-created cluster
const TAG_CREATED_BY: &str = "createdBy";

/// Tag value identifying this service as the creator
const TAG_CREATED_BY_VALUE: &str = "clusterBroker";

/// Tag carrying the hosted zone the cluster belongs to
const TAG_HOSTED_ZONE_ID: &str = "hostedZoneId";

/// EMR client for submitting and inspecting job flows
pub struct EmrClient {
    client: aws_sdk_emr::Client,
}

impl EmrClient {
    /// Create an EMR client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.emr_client(),
        }
    }
}

#[async_trait]
impl EmrOperations for EmrClient {
    async fn run_job_flow(&self, spec: JobFlowSpec) -> Result<String> {
        let applications = spec
            .applications
            .iter()
            .map(|name| Application::builder().name(name).build())
            .collect();

        let response = self
            .client
            .run_job_flow()
            .name(&spec.name)
            .visible_to_all_users(true)
            .release_label(&spec.release_label)
            .custom_ami_id(&spec.custom_ami_id)
            .repo_upgrade_on_boot(RepoUpgradeOnBoot::None)
            .set_steps(Some(spec.steps))
            .log_uri(&spec.log_uri)
            .service_role(&spec.service_role)
            .job_flow_role(&spec.job_flow_role)
            .auto_scaling_role(&spec.auto_scaling_role)
            .security_configuration(&spec.security_configuration)
            .set_applications(Some(applications))
            .instances(spec.instances)
            .set_configurations(Some(spec.configurations))
            .tags(
                Tag::builder()
                    .key(TAG_CREATED_BY)
                    .value(TAG_CREATED_BY_VALUE)
                    .build(),
            )
            .tags(
                Tag::builder()
                    .key(TAG_HOSTED_ZONE_ID)
                    .value(&spec.hosted_zone_id)
                    .build(),
            )
            .send()
            .await
            .context("Failed to submit job flow")?;

        let job_flow_id = response
            .job_flow_id()
            .context("No job flow id returned")?
            .to_string();

        info!(job_flow_id = %job_flow_id, name = %spec.name, "Job flow submitted");

        Ok(job_flow_id)
    }

    async fn describe_cluster_state(&self, cluster_id: &str) -> Result<String> {
        let response = self
            .client
            .describe_cluster()
            .cluster_id(cluster_id)
            .send()
            .await
            .context("Failed to describe cluster")?;

        let state = response
            .cluster()
            .and_then(|cluster| cluster.status())
            .and_then(|status| status.state())
            .context("Cluster has no reported state")?;

        debug!(cluster_id = %cluster_id, state = %state.as_str(), "Described cluster");

        Ok(state.as_str().to_string())
    }

    async fn list_clusters(&self) -> Result<Vec<ClusterView>> {
        let response = self
            .client
            .list_clusters()
            .send()
            .await
            .context("Failed to list clusters")?;

        Ok(response
            .clusters()
            .iter()
            .map(ClusterView::from_summary)
            .collect())
    }
}
