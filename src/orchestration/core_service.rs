use super::service::ResolvedService;
use crate::http::HttpMethod;

/// A core system service whose location is configured, not orchestrated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreService {
    pub service_definition: &'static str,
    /// Path below the core system's address
    pub path: &'static str,
    pub interface: &'static str,
    pub method: HttpMethod,
}

/// The orchestrator's own service; it cannot resolve itself
pub const ORCHESTRATION_SERVICE: CoreService = CoreService {
    service_definition: "orchestration-service",
    path: "orchestration",
    interface: "HTTP-SECURE-JSON",
    method: HttpMethod::Post,
};

/// Rule name the orchestration service is registered under
pub const ORCHESTRATION_RULE: &str = ORCHESTRATION_SERVICE.service_definition;

impl CoreService {
    /// Resolve against a `host:port[/base]` address
    pub fn resolve(&self, address: &str) -> ResolvedService {
        let url = format!(
            "https://{}/{}",
            address.trim_end_matches('/'),
            self.path
        );
        ResolvedService::preconfigured(self.service_definition, url, self.interface)
    }
}
