//! cluster-broker: HTTP broker for managed cluster provisioning

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cluster_broker::aws::{AwsContext, Ec2ImageClient, EmrClient};
use cluster_broker::cluster::{ClusterCreationService, ClusterMonitoringService};
use cluster_broker::config::{BrokerConfig, ConfigKey};
use cluster_broker::http::{serve, AppState};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cluster-broker")]
#[command(about = "HTTP broker for managed cluster provisioning")]
#[command(version)]
struct Args {
    /// Address to bind the HTTP API on
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = Arc::new(BrokerConfig::from_env());
    let region = config
        .get(ConfigKey::AwsRegion)
        .context("AWS region must be configured")?
        .to_string();

    let ctx = AwsContext::new(&region).await;
    let emr = Arc::new(EmrClient::from_context(&ctx));
    let images = Arc::new(Ec2ImageClient::from_context(&ctx));

    let creation = Arc::new(ClusterCreationService::new(
        Arc::clone(&config),
        emr.clone(),
        images,
    ));
    let monitoring = Arc::new(ClusterMonitoringService::new(emr));

    info!(region = %region, bind = %args.bind, "Starting cluster broker");

    serve(
        args.bind,
        AppState {
            config,
            creation,
            monitoring,
        },
    )
    .await
}
