//! Pure mapping from the inbound model to provisioning request shapes

use std::str::FromStr;

use aws_sdk_emr::types::{
    ActionOnFailure, Configuration, HadoopJarStepConfig, InstanceGroupConfig, InstanceRoleType,
    JobFlowInstancesConfig, MarketType, StepConfig,
};
use aws_smithy_types::error::operation::BuildError;
use thiserror::Error;

use crate::model::{
    CustomInstanceConfig, ExtraConfigBlock, FailureAction, GroupRole, InstanceTemplate, Step,
};

/// Request formatting errors
#[derive(Debug, Error)]
pub enum FormatError {
    /// The named instance template is not registered
    #[error("unknown instance template '{0}'")]
    UnknownTemplate(String),

    /// A request shape was missing a required field
    #[error("invalid provisioning request shape")]
    InvalidShape(#[from] BuildError),
}

/// Map caller steps 1:1 into step configs, preserving order
pub fn format_steps(steps: &[Step]) -> Result<Vec<StepConfig>, FormatError> {
    steps
        .iter()
        .map(|step| {
            let config = StepConfig::builder()
                .name(&step.name)
                .action_on_failure(failure_action(step.action_on_failure))
                .hadoop_jar_step(HadoopJarStepConfig::builder().jar(&step.jar_path).build()?)
                .build()?;
            Ok(config)
        })
        .collect()
}

/// Derive the full instance configuration from a named template.
///
/// Every group's pricing market is overridden per `use_spot_pricing`;
/// the template only fixes roles, types, and counts.
pub fn format_instance_config(
    config: &CustomInstanceConfig,
) -> Result<JobFlowInstancesConfig, FormatError> {
    let template = InstanceTemplate::from_str(&config.instance_template)
        .map_err(|_| FormatError::UnknownTemplate(config.instance_template.clone()))?;

    let market = if config.use_spot_pricing {
        MarketType::Spot
    } else {
        MarketType::OnDemand
    };

    let groups = template
        .instance_groups()
        .into_iter()
        .map(|group| {
            InstanceGroupConfig::builder()
                .instance_role(instance_role(group.role))
                .instance_type(group.instance_type)
                .instance_count(group.count)
                .market(market.clone())
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(JobFlowInstancesConfig::builder()
        .set_instance_groups(Some(groups))
        .ec2_subnet_id(&config.ec2_subnet_id)
        .keep_job_flow_alive_when_no_steps(config.keep_alive_post_job)
        .build())
}

/// Map extra configuration blocks 1:1, classification and properties
/// passed through verbatim
pub fn format_extra_configs(blocks: &[ExtraConfigBlock]) -> Vec<Configuration> {
    blocks
        .iter()
        .map(|block| {
            Configuration::builder()
                .classification(&block.classification)
                .set_properties(Some(block.properties.clone()))
                .build()
        })
        .collect()
}

fn failure_action(action: FailureAction) -> ActionOnFailure {
    match action {
        FailureAction::Continue => ActionOnFailure::Continue,
        FailureAction::Terminate => ActionOnFailure::TerminateCluster,
    }
}

fn instance_role(role: GroupRole) -> InstanceRoleType {
    match role {
        GroupRole::Master => InstanceRoleType::Master,
        GroupRole::Core => InstanceRoleType::Core,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn step(name: &str) -> Step {
        Step {
            name: name.to_string(),
            action_on_failure: FailureAction::Continue,
            jar_path: format!("{name}/jar"),
        }
    }

    fn instance_config(template: &str, use_spot: bool, keep_alive: bool) -> CustomInstanceConfig {
        CustomInstanceConfig {
            instance_template: template.to_string(),
            use_spot_pricing: use_spot,
            ec2_subnet_id: "subnet-0abc".to_string(),
            keep_alive_post_job: keep_alive,
        }
    }

    #[test]
    fn steps_map_one_to_one_in_order() {
        let steps = vec![step("step1"), step("step2"), step("step3")];
        let formatted = format_steps(&steps).unwrap();

        assert_eq!(formatted.len(), 3);
        for (expected, actual) in steps.iter().zip(&formatted) {
            assert_eq!(actual.name(), expected.name);
            assert_eq!(actual.action_on_failure(), Some(&ActionOnFailure::Continue));
            assert_eq!(actual.hadoop_jar_step().jar(), expected.jar_path);
        }
    }

    #[test]
    fn terminate_maps_to_terminate_cluster() {
        let steps = vec![Step {
            name: "cleanup".to_string(),
            action_on_failure: FailureAction::Terminate,
            jar_path: "cleanup/jar".to_string(),
        }];
        let formatted = format_steps(&steps).unwrap();
        assert_eq!(
            formatted[0].action_on_failure(),
            Some(&ActionOnFailure::TerminateCluster)
        );
    }

    #[test]
    fn empty_step_list_formats_to_empty() {
        assert!(format_steps(&[]).unwrap().is_empty());
    }

    #[test]
    fn spot_pricing_applies_to_every_group() {
        let formatted = format_instance_config(&instance_config("LARGE", true, false)).unwrap();

        assert!(!formatted.instance_groups().is_empty());
        for group in formatted.instance_groups() {
            assert_eq!(group.market(), Some(&MarketType::Spot));
        }
        assert_eq!(formatted.keep_job_flow_alive_when_no_steps(), Some(false));
    }

    #[test]
    fn on_demand_pricing_applies_to_every_group() {
        let formatted = format_instance_config(&instance_config("SMALL", false, true)).unwrap();

        for group in formatted.instance_groups() {
            assert_eq!(group.market(), Some(&MarketType::OnDemand));
        }
        assert_eq!(formatted.keep_job_flow_alive_when_no_steps(), Some(true));
    }

    #[test]
    fn subnet_id_is_attached() {
        let formatted = format_instance_config(&instance_config("SMALL", false, false)).unwrap();
        assert_eq!(formatted.ec2_subnet_id(), Some("subnet-0abc"));
    }

    #[test]
    fn template_groups_carry_roles_and_counts() {
        let formatted = format_instance_config(&instance_config("SMALL", false, false)).unwrap();
        let groups = formatted.instance_groups();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].instance_role(), &InstanceRoleType::Master);
        assert_eq!(groups[0].instance_count(), 1);
        assert_eq!(groups[1].instance_role(), &InstanceRoleType::Core);
        assert_eq!(groups[1].instance_count(), 2);
    }

    #[test]
    fn unknown_template_is_rejected() {
        let err = format_instance_config(&instance_config("COLOSSAL", false, false)).unwrap_err();
        assert!(matches!(err, FormatError::UnknownTemplate(ref name) if name == "COLOSSAL"));
    }

    #[test]
    fn extra_configs_pass_through_verbatim() {
        let blocks = vec![ExtraConfigBlock {
            classification: "spark-defaults".to_string(),
            properties: HashMap::from([(
                "spark.executor.memory".to_string(),
                "4g".to_string(),
            )]),
        }];

        let formatted = format_extra_configs(&blocks);

        assert_eq!(formatted.len(), 1);
        assert_eq!(formatted[0].classification(), Some("spark-defaults"));
        assert_eq!(
            formatted[0]
                .properties()
                .and_then(|props| props.get("spark.executor.memory"))
                .map(String::as_str),
            Some("4g")
        );
    }
}
