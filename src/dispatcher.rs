//! # Consumption Dispatcher
//!
//! Sends a request through a named rule: looks the rule up, refuses unbound
//! rules, and issues the rule's verb against the bound service's URL.

use std::sync::Arc;
use tracing::{error, info};

use crate::error::{ConsumerError, ConsumerResult};
use crate::http::{HttpResponse, HttpTransport, OutboundRequest, RequestBody};
use crate::rules::RuleTable;

/// Form-encoded request payload
pub type FormPayload = Vec<(String, String)>;

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }

    /// Dispatch `rule` with an optional form payload and JSON body.
    ///
    /// Bodies are only attached for POST and PUT. A response outside 2xx is
    /// logged and returned, not raised.
    pub async fn dispatch(
        &self,
        rules: &RuleTable,
        rule: &str,
        payload: Option<FormPayload>,
        json: Option<serde_json::Value>,
    ) -> ConsumerResult<HttpResponse> {
        let Some(entry) = rules.get(rule) else {
            error!(rule = %rule, "Rule '{}' is not registered", rule);
            return Err(ConsumerError::UnknownRule {
                rule: rule.to_string(),
            });
        };

        let Some(service) = entry.service.as_ref() else {
            error!(rule = %rule, "Rule '{}' does not have a corresponding service", rule);
            return Err(ConsumerError::UnboundService {
                rule: rule.to_string(),
            });
        };

        let method = entry.method;
        let request = OutboundRequest {
            method,
            url: service.url.clone(),
            body: RequestBody::for_method(method, payload, json),
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    rule = %rule,
                    service_definition = %service.service_definition,
                    url = %service.url,
                    error = %e,
                    "Request to service failed"
                );
                return Err(e);
            }
        };

        if !response.is_success() {
            error!(
                rule = %rule,
                service_definition = %service.service_definition,
                status = response.status,
                "Consumption of service '{}' failed: Status <{}>",
                service.service_definition,
                response.status
            );
        }
        info!(
            rule = %rule,
            method = %method,
            url = %service.url,
            status = response.status,
            "Consumed service '{}'",
            service.service_definition
        );

        Ok(response)
    }
}
