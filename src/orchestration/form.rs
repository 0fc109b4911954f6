use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::system::{SystemDto, SystemIdentity};

/// Request body for `POST /orchestration`
///
/// Fields this client never fills are still serialized as explicit `null`s,
/// matching what the orchestrator expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationForm {
    pub commands: Option<HashMap<String, String>>,
    pub orchestration_flags: OrchestrationFlags,
    pub preferred_providers: Option<Vec<serde_json::Value>>,
    pub requested_service: Option<ServiceRequirement>,
    pub requester_cloud: Option<serde_json::Value>,
    pub requester_system: SystemDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationFlags {
    /// Force the orchestrator to re-resolve instead of using its store
    pub override_store: bool,
}

/// Requested service sub-form; only the definition requirement is populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequirement {
    pub service_definition_requirement: String,
    pub interface_requirements: Option<Vec<String>>,
    pub security_requirements: Option<Vec<String>>,
    pub metadata_requirements: Option<HashMap<String, String>>,
    pub version_requirement: Option<i32>,
    pub max_version_requirement: Option<i32>,
    pub min_version_requirement: Option<i32>,
}

impl ServiceRequirement {
    pub fn for_definition(service_definition: impl Into<String>) -> Self {
        Self {
            service_definition_requirement: service_definition.into(),
            interface_requirements: None,
            security_requirements: None,
            metadata_requirements: None,
            version_requirement: None,
            max_version_requirement: None,
            min_version_requirement: None,
        }
    }
}

impl OrchestrationForm {
    /// Build a form for `service_definition`, or a store query when absent or empty
    pub fn new(requester: &SystemIdentity, service_definition: Option<&str>) -> Self {
        let requested_service = service_definition
            .filter(|definition| !definition.is_empty())
            .map(ServiceRequirement::for_definition);

        Self {
            commands: None,
            orchestration_flags: OrchestrationFlags {
                override_store: requested_service.is_some(),
            },
            preferred_providers: None,
            requested_service,
            requester_cloud: None,
            requester_system: requester.dto(),
        }
    }
}
