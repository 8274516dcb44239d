//! HTTP API for cluster creation and monitoring

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::aws::ec2::ImageError;
use crate::cluster::creation::{ClusterCreationService, CreationError};
use crate::cluster::format::FormatError;
use crate::cluster::monitoring::ClusterMonitoringService;
use crate::config::{BrokerConfig, ConfigKey};
use crate::model::CreationRequest;

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BrokerConfig>,
    pub creation: Arc<ClusterCreationService>,
    pub monitoring: Arc<ClusterMonitoringService>,
}

/// Build the broker router.
///
/// The read endpoints are GET-only; axum answers 405 for other methods
/// on a matched path and 404 for unmatched paths (including
/// `/cluster/status` with no id).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cluster/submit/{name}", post(handle_submit))
        .route("/cluster/status/{id}", get(handle_status))
        .route("/cluster/list", get(handle_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the broker API on the given address
pub async fn serve(address: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!(address = %address, "Broker API listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Accept a creation request: blacklist check, then a fire-and-forget
/// submission. 200 means accepted, not created; callers poll the status
/// endpoint for progress.
async fn handle_submit(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<CreationRequest>,
) -> Response {
    let job_flow_role = match state
        .config
        .if_empty(&request.job_flow_role, ConfigKey::JobFlowRole)
    {
        Ok(role) => role,
        Err(err) => {
            error!(cluster = %name, error = %err, "Cannot resolve job flow role");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    match state.creation.job_flow_role_is_blacklisted(&job_flow_role) {
        Ok(true) => {
            info!(cluster = %name, role = %job_flow_role, "Rejected blacklisted job flow role");
            return (
                StatusCode::BAD_REQUEST,
                format!("Job flow role '{job_flow_role}' is blacklisted"),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(err) => {
            error!(cluster = %name, error = %err, "Cannot resolve job flow role blacklist");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    }

    match state.creation.submit(&name, &request).await {
        Ok(()) => (StatusCode::OK, format!("Cluster {name} accepted")).into_response(),
        Err(err) => creation_error_response(&name, err),
    }
}

fn creation_error_response(name: &str, err: CreationError) -> Response {
    match &err {
        CreationError::Format(FormatError::UnknownTemplate(_)) => {
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        CreationError::Image(ImageError::NoImageFound { .. }) => {
            error!(cluster = %name, error = %err, "No machine image for cluster");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
        CreationError::Image(_) => {
            error!(cluster = %name, error = ?err, "Image lookup failed");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
        _ => {
            error!(cluster = %name, error = ?err, "Cluster submission rejected");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn handle_status(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.monitoring.get_cluster_status(&id).await {
        Ok(status) => (StatusCode::OK, status).into_response(),
        Err(err) => {
            error!(cluster_id = %id, error = ?err, "Failed to fetch cluster status");
            (
                StatusCode::BAD_GATEWAY,
                "Failed to fetch cluster status".to_string(),
            )
                .into_response()
        }
    }
}

async fn handle_list(State(state): State<AppState>) -> Response {
    match state.monitoring.list_all_clusters().await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = ?err, "Failed to list clusters");
            (
                StatusCode::BAD_GATEWAY,
                "Failed to list clusters".to_string(),
            )
                .into_response()
        }
    }
}
