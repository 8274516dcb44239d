//! Cluster creation and monitoring services

pub mod creation;
pub mod format;
pub mod monitoring;

pub use creation::{ClusterCreationService, CreationError};
pub use format::FormatError;
pub use monitoring::ClusterMonitoringService;
