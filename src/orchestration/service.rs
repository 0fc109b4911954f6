use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{ConsumerError, ConsumerResult};
use crate::http::HttpResponse;
use crate::system::{ProviderSystem, SystemDto};

/// A concrete, reachable service returned by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    pub service_definition: String,
    /// Absolute URL requests for this service are sent to
    pub url: String,
    /// `None` for services that were configured rather than orchestrated
    pub provider: Option<ProviderSystem>,
    pub interfaces: Vec<String>,
    pub metadata: HashMap<String, String>,
    pub version: Option<i32>,
    pub warnings: Vec<String>,
}

impl ResolvedService {
    /// A statically configured service that bypasses orchestration
    pub fn preconfigured(
        service_definition: impl Into<String>,
        url: impl Into<String>,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            service_definition: service_definition.into(),
            url: url.into(),
            provider: None,
            interfaces: vec![interface.into()],
            metadata: HashMap::new(),
            version: None,
            warnings: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OrchestrationResponseDto {
    response: Vec<OrchestrationResultDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrchestrationResultDto {
    provider: SystemDto,
    service: ServiceDefinitionDto,
    #[serde(default)]
    service_uri: String,
    #[serde(default)]
    secure: Option<String>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
    #[serde(default)]
    interfaces: Vec<InterfaceDto>,
    #[serde(default)]
    version: Option<i32>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceDefinitionDto {
    service_definition: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InterfaceDto {
    interface_name: String,
}

impl From<OrchestrationResultDto> for ResolvedService {
    fn from(dto: OrchestrationResultDto) -> Self {
        // Only explicitly insecure providers are reached over plain HTTP
        let scheme = match dto.secure.as_deref() {
            Some("NOT_SECURE") => "http",
            _ => "https",
        };
        let provider = ProviderSystem::from(dto.provider);
        let url = format!(
            "{}://{}/{}",
            scheme,
            provider.url(),
            dto.service_uri.trim_start_matches('/')
        );

        Self {
            service_definition: dto.service.service_definition,
            url,
            provider: Some(provider),
            interfaces: dto.interfaces.into_iter().map(|i| i.interface_name).collect(),
            metadata: dto.metadata.unwrap_or_default(),
            version: dto.version,
            warnings: dto.warnings,
        }
    }
}

/// Decode the `response` array of an orchestration reply
///
/// A body that is not JSON, or lacks the `response` key, is an error.
pub fn decode_orchestration_response(
    response: &HttpResponse,
) -> ConsumerResult<Vec<ResolvedService>> {
    let dto: OrchestrationResponseDto = response
        .json()
        .map_err(|e| ConsumerError::decode(e.to_string()))?;

    Ok(dto.response.into_iter().map(ResolvedService::from).collect())
}
