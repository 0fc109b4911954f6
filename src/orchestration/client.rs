use tracing::{debug, error, info};

use super::core_service::ORCHESTRATION_RULE;
use super::form::OrchestrationForm;
use super::service::{decode_orchestration_response, ResolvedService};
use crate::dispatcher::Dispatcher;
use crate::error::{ConsumerError, ConsumerResult};
use crate::rules::RuleTable;
use crate::system::SystemIdentity;

/// Resolves service definitions to providers by asking the orchestrator
///
/// The orchestrator is reached through the [`ORCHESTRATION_RULE`] entry of the
/// rule table, so the rule must be seeded before `resolve` is called.
#[derive(Debug, Clone)]
pub struct OrchestrationClient {
    requester: SystemIdentity,
}

impl OrchestrationClient {
    pub fn new(requester: SystemIdentity) -> Self {
        Self { requester }
    }

    /// Build the orchestration form for `service_definition`
    pub fn form(&self, service_definition: Option<&str>) -> OrchestrationForm {
        OrchestrationForm::new(&self.requester, service_definition)
    }

    /// Ask the orchestrator for providers of `service_definition`
    ///
    /// A non-200 status is logged and yields an empty sequence. Failing to
    /// reach the orchestrator, or a body without a `response` array, is an
    /// error.
    pub async fn resolve(
        &self,
        dispatcher: &Dispatcher,
        rules: &RuleTable,
        service_definition: Option<&str>,
    ) -> ConsumerResult<Vec<ResolvedService>> {
        let service_definition = normalize_definition(service_definition);
        let form = self.form(service_definition);
        let body = serde_json::to_value(&form)?;

        debug!(
            service_definition = ?service_definition,
            override_store = form.orchestration_flags.override_store,
            "Querying orchestrator"
        );

        let response = dispatcher
            .dispatch(rules, ORCHESTRATION_RULE, None, Some(body))
            .await
            .map_err(|e| ConsumerError::orchestration_transport(service_definition, e))?;

        if response.status != 200 {
            error!(
                service_definition = ?service_definition,
                status = response.status,
                "Orchestration for service {} failed: Orchestrator status <{}>",
                service_definition.unwrap_or("<stored>"),
                response.status
            );
            return Ok(Vec::new());
        }

        let services = decode_orchestration_response(&response)?;
        info!(
            service_definition = ?service_definition,
            resolved = services.len(),
            "Orchestration completed"
        );
        Ok(services)
    }
}

/// An empty definition means the same as none: ask for what is stored
pub fn normalize_definition(service_definition: Option<&str>) -> Option<&str> {
    service_definition.filter(|definition| !definition.is_empty())
}
