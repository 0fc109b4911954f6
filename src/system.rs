//! # System Identity
//!
//! Immutable descriptions of Arrowhead systems: the local consumer identity that
//! is embedded in every orchestration request, and the provider systems named in
//! orchestration responses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire representation of an Arrowhead system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDto {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub authentication_info: Option<String>,
}

/// Identity of the local consumer system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub authentication_info: String,
}

impl SystemIdentity {
    pub fn new(
        system_name: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        authentication_info: impl Into<String>,
    ) -> Self {
        Self {
            system_name: system_name.into(),
            address: address.into(),
            port,
            authentication_info: authentication_info.into(),
        }
    }

    /// `address:port` of this system
    pub fn url(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn dto(&self) -> SystemDto {
        SystemDto {
            system_name: self.system_name.clone(),
            address: self.address.clone(),
            port: self.port,
            authentication_info: Some(self.authentication_info.clone()),
        }
    }
}

impl fmt::Display for SystemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.system_name, self.url())
    }
}

/// A system that provides a service, as reported by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSystem {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    pub authentication_info: Option<String>,
}

impl ProviderSystem {
    pub fn url(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl From<SystemDto> for ProviderSystem {
    fn from(dto: SystemDto) -> Self {
        Self {
            system_name: dto.system_name,
            address: dto.address,
            port: dto.port,
            authentication_info: dto.authentication_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_url_and_dto() {
        let identity = SystemIdentity::new("thermostat", "10.0.0.7", 8443, "cert-fingerprint");
        assert_eq!(identity.url(), "10.0.0.7:8443");

        let json = serde_json::to_value(identity.dto()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "systemName": "thermostat",
                "address": "10.0.0.7",
                "port": 8443,
                "authenticationInfo": "cert-fingerprint"
            })
        );
    }

    #[test]
    fn test_provider_from_dto_without_auth_info() {
        let dto: SystemDto = serde_json::from_value(serde_json::json!({
            "systemName": "sensor",
            "address": "192.168.1.20",
            "port": 9001
        }))
        .unwrap();
        let provider = ProviderSystem::from(dto);
        assert_eq!(provider.system_name, "sensor");
        assert_eq!(provider.url(), "192.168.1.20:9001");
        assert!(provider.authentication_info.is_none());
    }
}
