//! EC2 machine image lookup

use async_trait::async_trait;
use aws_sdk_ec2::types::{Filter, Image};
use thiserror::Error;
use tracing::debug;

use crate::aws::context::AwsContext;

/// Image lookup errors
#[derive(Debug, Error)]
pub enum ImageError {
    /// The registry returned no image matching the search pattern
    #[error("no machine image found matching '{pattern}'")]
    NoImageFound { pattern: String },

    /// The DescribeImages call itself failed
    #[error("failed to describe images matching '{pattern}'")]
    DescribeImages {
        pattern: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Trait for image lookup that can be mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageOperations: Send + Sync {
    /// Resolve the id of the most recently created image whose name
    /// matches `search_pattern`
    async fn resolve_latest_image(&self, search_pattern: &str) -> Result<String, ImageError>;
}

/// EC2 client used only for machine image lookup
pub struct Ec2ImageClient {
    client: aws_sdk_ec2::Client,
}

impl Ec2ImageClient {
    /// Create an image client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }
}

#[async_trait]
impl ImageOperations for Ec2ImageClient {
    /// One DescribeImages call per invocation; no caching, so every
    /// submission sees the registry's current state.
    async fn resolve_latest_image(&self, search_pattern: &str) -> Result<String, ImageError> {
        let response = self
            .client
            .describe_images()
            .filters(Filter::builder().name("name").values(search_pattern).build())
            .send()
            .await
            .map_err(|e| ImageError::DescribeImages {
                pattern: search_pattern.to_string(),
                source: Box::new(e),
            })?;

        let ami = latest_image_id(response.images(), search_pattern)?;
        debug!(ami = %ami, pattern = %search_pattern, "Resolved latest image");
        Ok(ami)
    }
}

/// Pick the most recently created image.
///
/// Stable sort by creation date descending, so registry order breaks
/// ties. An empty match set is an error, not an out-of-bounds access.
fn latest_image_id(images: &[Image], pattern: &str) -> Result<String, ImageError> {
    let mut images: Vec<_> = images.iter().collect();
    images.sort_by(|a, b| {
        b.creation_date()
            .unwrap_or_default()
            .cmp(a.creation_date().unwrap_or_default())
    });

    images
        .first()
        .and_then(|img| img.image_id())
        .map(str::to_string)
        .ok_or_else(|| ImageError::NoImageFound {
            pattern: pattern.to_string(),
        })
}
