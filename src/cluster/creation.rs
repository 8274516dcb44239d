//! Cluster creation orchestration

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use crate::aws::ec2::{ImageError, ImageOperations};
use crate::aws::emr::{EmrOperations, JobFlowSpec};
use crate::cluster::format::{
    format_extra_configs, format_instance_config, format_steps, FormatError,
};
use crate::config::{BrokerConfig, ConfigError, ConfigKey};
use crate::model::CreationRequest;

/// Errors on the synchronous part of the submission path.
///
/// Everything here is raised before the provisioning call is issued;
/// failures of the call itself are asynchronous and only logged.
#[derive(Debug, Error)]
pub enum CreationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Builds and submits provisioning requests for new clusters
pub struct ClusterCreationService {
    config: Arc<BrokerConfig>,
    emr: Arc<dyn EmrOperations>,
    images: Arc<dyn ImageOperations>,
}

impl ClusterCreationService {
    pub fn new(
        config: Arc<BrokerConfig>,
        emr: Arc<dyn EmrOperations>,
        images: Arc<dyn ImageOperations>,
    ) -> Self {
        Self {
            config,
            emr,
            images,
        }
    }

    /// Whether `role` is disallowed as the job flow role.
    ///
    /// Callers are expected to check this before [`submit`]; `submit`
    /// itself does not.
    ///
    /// [`submit`]: ClusterCreationService::submit
    pub fn job_flow_role_is_blacklisted(&self, role: &str) -> Result<bool, ConfigError> {
        Ok(self
            .config
            .get_list(ConfigKey::JobFlowRoleBlacklist)?
            .iter()
            .any(|entry| entry == role))
    }

    /// Submit one cluster creation request.
    ///
    /// Resolves defaults, looks up the machine image, and builds the
    /// full job flow request synchronously; the provisioning call itself
    /// is fired on a detached task. A failure of that call is logged,
    /// not returned: by then the caller has already been answered.
    pub async fn submit(
        &self,
        cluster_name: &str,
        request: &CreationRequest,
    ) -> Result<(), CreationError> {
        let service_role = self
            .config
            .if_empty(&request.service_role, ConfigKey::ServiceRole)?;
        let job_flow_role = self
            .config
            .if_empty(&request.job_flow_role, ConfigKey::JobFlowRole)?;
        let auto_scaling_role = self
            .config
            .if_empty(&request.auto_scaling_role, ConfigKey::AutoScalingRole)?;
        let hosted_zone_id = self
            .config
            .if_empty(&request.hosted_zone_id, ConfigKey::HostedZoneId)?;

        // Format before the image lookup so a malformed request never
        // reaches the registry
        let steps = format_steps(&request.steps)?;
        let instances = format_instance_config(&request.custom_instance_config)?;
        let configurations = format_extra_configs(&request.custom_emr_configs);

        let search_pattern = self.config.get(ConfigKey::AmiSearchPattern)?;
        let ami_id = self.images.resolve_latest_image(search_pattern).await?;

        let spec = JobFlowSpec {
            name: cluster_name.to_string(),
            release_label: self.config.get(ConfigKey::EmrReleaseLabel)?.to_string(),
            custom_ami_id: ami_id,
            log_uri: self.config.get(ConfigKey::S3LogUri)?.to_string(),
            service_role,
            job_flow_role,
            auto_scaling_role,
            security_configuration: self
                .config
                .get(ConfigKey::SecurityConfiguration)?
                .to_string(),
            hosted_zone_id,
            applications: request.applications.clone(),
            steps,
            instances,
            configurations,
        };

        info!(cluster = %cluster_name, ami = %spec.custom_ami_id, "Starting cluster");

        let emr = Arc::clone(&self.emr);
        let name = cluster_name.to_string();
        tokio::spawn(async move {
            if let Err(err) = emr.run_job_flow(spec).await {
                error!(cluster = %name, error = ?err, "Failed to start cluster");
            }
        });

        Ok(())
    }
}
