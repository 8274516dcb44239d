//! Read-only cluster monitoring passthrough

use std::sync::Arc;

use anyhow::Result;

use crate::aws::emr::EmrOperations;

/// Proxies status and listing reads to the provisioning service.
///
/// No transformation beyond serialization; the broker does not track
/// cluster state itself.
pub struct ClusterMonitoringService {
    emr: Arc<dyn EmrOperations>,
}

impl ClusterMonitoringService {
    pub fn new(emr: Arc<dyn EmrOperations>) -> Self {
        Self { emr }
    }

    /// Current state of one cluster, as reported by the provisioning
    /// service
    pub async fn get_cluster_status(&self, cluster_id: &str) -> Result<String> {
        self.emr.describe_cluster_state(cluster_id).await
    }

    /// All clusters, serialized in the provisioning service's shape
    pub async fn list_all_clusters(&self) -> Result<String> {
        let clusters = self.emr.list_clusters().await?;
        Ok(serde_json::to_string(&clusters)?)
    }
}
