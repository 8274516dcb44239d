//! AWS service clients for the broker
//!
//! - EC2: machine image lookup
//! - EMR: job flow submission and cluster reads

pub mod context;
pub mod ec2;
pub mod emr;

pub use context::AwsContext;
pub use ec2::{Ec2ImageClient, ImageError, ImageOperations};
pub use emr::{ClusterView, EmrClient, EmrOperations, JobFlowSpec};
