//! EMR operations trait for testing
//!
//! Abstracts the provisioning client so orchestration and monitoring
//! logic can be unit tested without hitting real AWS.

use anyhow::Result;
use async_trait::async_trait;

use super::types::{ClusterView, JobFlowSpec};

/// Trait for provisioning-service operations that can be mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmrOperations: Send + Sync {
    /// Submit one job flow; returns the created job flow id
    async fn run_job_flow(&self, spec: JobFlowSpec) -> Result<String>;

    /// Current state of a single cluster
    async fn describe_cluster_state(&self, cluster_id: &str) -> Result<String>;

    /// All clusters visible to the account
    async fn list_clusters(&self) -> Result<Vec<ClusterView>>;
}
