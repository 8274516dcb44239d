//! Provisioning request and response shapes

use aws_sdk_emr::types::{
    ClusterStateChangeReason, ClusterStatus, ClusterSummary, ClusterTimeline, Configuration,
    JobFlowInstancesConfig, StepConfig,
};
use aws_smithy_types::DateTime;
use serde::Serialize;

/// Everything needed for one job flow submission.
///
/// Plain data assembled by the orchestrator; `EmrClient` maps it onto
/// the RunJobFlow request builder.
#[derive(Debug, Clone)]
pub struct JobFlowSpec {
    pub name: String,
    pub release_label: String,
    pub custom_ami_id: String,
    pub log_uri: String,
    pub service_role: String,
    pub job_flow_role: String,
    pub auto_scaling_role: String,
    pub security_configuration: String,
    /// Recorded on the cluster as the `hostedZoneId` tag
    pub hosted_zone_id: String,
    pub applications: Vec<String>,
    pub steps: Vec<StepConfig>,
    pub instances: JobFlowInstancesConfig,
    pub configurations: Vec<Configuration>,
}

/// One cluster in the listing, serialized in the provisioning API's
/// shape. The SDK response types do not implement `Serialize`, so the
/// monitoring passthrough mirrors them field for field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<StatusView>,
    pub normalized_instance_hours: Option<i32>,
    pub cluster_arn: Option<String>,
    pub outpost_arn: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub state_change_reason: Option<StateChangeReasonView>,
    pub timeline: Option<TimelineView>,
    pub state_as_string: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChangeReasonView {
    pub message: Option<String>,
    pub code_as_string: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub creation_date_time: Option<InstantView>,
    pub ready_date_time: Option<InstantView>,
    pub end_date_time: Option<InstantView>,
}

/// A point in time as the provisioning API serializes one
#[derive(Debug, Clone, Serialize)]
pub struct InstantView {
    pub nano: u32,
    #[serde(rename = "epochSecond")]
    pub epoch_second: i64,
}

impl ClusterView {
    pub fn from_summary(summary: &ClusterSummary) -> Self {
        Self {
            id: summary.id().map(str::to_string),
            name: summary.name().map(str::to_string),
            status: summary.status().map(StatusView::from_status),
            normalized_instance_hours: summary.normalized_instance_hours(),
            cluster_arn: summary.cluster_arn().map(str::to_string),
            outpost_arn: summary.outpost_arn().map(str::to_string),
        }
    }
}

impl StatusView {
    pub fn from_status(status: &ClusterStatus) -> Self {
        Self {
            state_change_reason: status
                .state_change_reason()
                .map(StateChangeReasonView::from_reason),
            timeline: status.timeline().map(TimelineView::from_timeline),
            state_as_string: status.state().map(|state| state.as_str().to_string()),
        }
    }
}

impl StateChangeReasonView {
    pub fn from_reason(reason: &ClusterStateChangeReason) -> Self {
        Self {
            message: reason.message().map(str::to_string),
            code_as_string: reason.code().map(|code| code.as_str().to_string()),
        }
    }
}

impl TimelineView {
    pub fn from_timeline(timeline: &ClusterTimeline) -> Self {
        Self {
            creation_date_time: timeline.creation_date_time().map(InstantView::from_instant),
            ready_date_time: timeline.ready_date_time().map(InstantView::from_instant),
            end_date_time: timeline.end_date_time().map(InstantView::from_instant),
        }
    }
}

impl InstantView {
    pub fn from_instant(instant: &DateTime) -> Self {
        Self {
            nano: instant.subsec_nanos(),
            epoch_second: instant.secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use aws_sdk_emr::types::{ClusterState, ClusterStateChangeReasonCode};

    use super::*;

    #[test]
    fn cluster_view_serializes_in_api_shape() {
        let view = ClusterView {
            id: Some("j-A000AAAA00AA".to_string()),
            name: Some("analytics".to_string()),
            status: Some(StatusView {
                state_change_reason: Some(StateChangeReasonView {
                    message: Some("Terminated by user request".to_string()),
                    code_as_string: Some("USER_REQUEST".to_string()),
                }),
                timeline: Some(TimelineView {
                    creation_date_time: Some(InstantView {
                        nano: 0,
                        epoch_second: 1_609_459_200,
                    }),
                    ready_date_time: None,
                    end_date_time: None,
                }),
                state_as_string: Some("TERMINATED".to_string()),
            }),
            normalized_instance_hours: Some(64),
            cluster_arn: Some(
                "arn:aws:elasticmapreduce:us-east-1:000000000000:cluster/j-A000AAAA00AA"
                    .to_string(),
            ),
            outpost_arn: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "j-A000AAAA00AA");
        assert_eq!(json["status"]["stateAsString"], "TERMINATED");
        assert_eq!(
            json["status"]["stateChangeReason"]["codeAsString"],
            "USER_REQUEST"
        );
        assert_eq!(
            json["status"]["timeline"]["creationDateTime"]["epochSecond"],
            1_609_459_200
        );
        assert_eq!(json["status"]["timeline"]["creationDateTime"]["nano"], 0);
        assert_eq!(json["normalizedInstanceHours"], 64);
    }

    #[test]
    fn from_summary_copies_nested_status() {
        let summary = ClusterSummary::builder()
            .id("j-1")
            .name("reporting")
            .status(
                ClusterStatus::builder()
                    .state(ClusterState::Running)
                    .state_change_reason(
                        ClusterStateChangeReason::builder()
                            .code(ClusterStateChangeReasonCode::UserRequest)
                            .message("running".to_string())
                            .build(),
                    )
                    .timeline(
                        ClusterTimeline::builder()
                            .creation_date_time(DateTime::from_secs(1_622_505_600))
                            .build(),
                    )
                    .build(),
            )
            .normalized_instance_hours(8)
            .build();

        let view = ClusterView::from_summary(&summary);
        let status = view.status.unwrap();
        assert_eq!(status.state_as_string.as_deref(), Some("RUNNING"));
        assert_eq!(
            status.timeline.unwrap().creation_date_time.unwrap().epoch_second,
            1_622_505_600
        );
        assert_eq!(view.normalized_instance_hours, Some(8));
    }
}
