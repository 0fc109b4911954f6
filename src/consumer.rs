//! # Consumer System
//!
//! An Arrowhead consumer: a system identity plus the rule table it consumes
//! services through.
//!
//! On construction the orchestration core service is seeded into the rule
//! table directly, because orchestration cannot resolve itself. Every other
//! rule is added by asking the orchestrator.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arrowhead_consumer::{ConsumerConfig, ConsumerSystem, HttpMethod};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConsumerConfig::load_from_file(Path::new("consumer.ini"))?;
//! let mut consumer = ConsumerSystem::connect(config)?;
//!
//! consumer
//!     .add_orchestration_rule("get-temperature", HttpMethod::Get, Some("temperature"))
//!     .await?;
//! let response = consumer.consume("get-temperature", None, None).await?;
//! println!("{}: {}", response.status, response.text());
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::ConsumerConfig;
use crate::dispatcher::{Dispatcher, FormPayload};
use crate::error::ConsumerResult;
use crate::http::{HttpMethod, HttpResponse, HttpTransport, ReqwestTransport};
use crate::orchestration::{
    normalize_definition, CoreService, OrchestrationClient, ResolvedService, ORCHESTRATION_SERVICE,
};
use crate::rules::{select_first, RuleTable};
use crate::system::SystemIdentity;

#[derive(Debug)]
pub struct ConsumerSystem {
    config: ConsumerConfig,
    identity: SystemIdentity,
    rules: RuleTable,
    dispatcher: Dispatcher,
    orchestration: OrchestrationClient,
}

impl ConsumerSystem {
    /// Create a consumer that talks over mutual TLS using the configured credentials
    pub fn connect(config: ConsumerConfig) -> ConsumerResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a consumer on top of an arbitrary transport
    pub fn with_transport(
        config: ConsumerConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> ConsumerResult<Self> {
        config.validate()?;
        let identity = config.identity();

        let mut consumer = Self {
            orchestration: OrchestrationClient::new(identity.clone()),
            dispatcher: Dispatcher::new(transport),
            rules: RuleTable::new(),
            identity,
            config,
        };
        consumer.register_core_service(&ORCHESTRATION_SERVICE, None);

        info!(
            system_name = %consumer.identity.system_name,
            transport = consumer.dispatcher.transport_name(),
            "ConsumerSystem initialized at {}",
            consumer.identity.url()
        );
        Ok(consumer)
    }

    pub fn identity(&self) -> &SystemIdentity {
        &self.identity
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Client certificate and private key paths
    pub fn cert(&self) -> (&Path, &Path) {
        (&self.config.certfile, &self.config.keyfile)
    }

    fn register_core_service(&mut self, core: &CoreService, method_override: Option<HttpMethod>) {
        let service = core.resolve(&self.config.orchestrator_address);
        self.register_pre_resolved(core.service_definition, service, core.method, method_override);
    }

    /// Bind `rule` to an already known service, bypassing orchestration
    pub fn register_pre_resolved(
        &mut self,
        rule: &str,
        service: ResolvedService,
        default_method: HttpMethod,
        method_override: Option<HttpMethod>,
    ) {
        self.rules
            .register_pre_resolved(rule, service, method_override.unwrap_or(default_method));
    }

    /// Resolve `service_definition` and bind the first provider to `rule`.
    ///
    /// An empty result leaves the rule registered but unbound. Any earlier
    /// rule of the same name is replaced.
    #[instrument(skip(self), fields(system = %self.identity.system_name))]
    pub async fn add_orchestration_rule(
        &mut self,
        rule: &str,
        method: HttpMethod,
        service_definition: Option<&str>,
    ) -> ConsumerResult<()> {
        let service_definition = normalize_definition(service_definition);
        let candidates = self.query_orchestration(service_definition).await?;
        let service = select_first(service_definition, candidates);

        self.rules.insert(rule, method, service);
        info!(rule = %rule, method = %method, "Added service consumption rule {}", rule);
        Ok(())
    }

    /// Orchestrate `service_definition` into a rule of the same name.
    ///
    /// `method_name` is validated before the orchestrator is contacted.
    pub async fn add_consumed_service(
        &mut self,
        service_definition: &str,
        method_name: &str,
    ) -> ConsumerResult<()> {
        let method: HttpMethod = method_name.parse()?;
        self.add_orchestration_rule(service_definition, method, Some(service_definition))
            .await
    }

    /// Change the verb of an existing rule without touching its binding
    pub fn set_rule_method(&mut self, rule: &str, method_name: &str) -> ConsumerResult<()> {
        let method: HttpMethod = method_name.parse()?;
        self.rules.update_method(rule, method)
    }

    /// Ask the orchestrator for every provider of `service_definition`
    pub async fn query_orchestration(
        &self,
        service_definition: Option<&str>,
    ) -> ConsumerResult<Vec<ResolvedService>> {
        self.orchestration
            .resolve(&self.dispatcher, &self.rules, service_definition)
            .await
    }

    /// Consume the service bound to `rule`
    #[instrument(skip(self, payload, json), fields(system = %self.identity.system_name))]
    pub async fn consume(
        &self,
        rule: &str,
        payload: Option<FormPayload>,
        json: Option<serde_json::Value>,
    ) -> ConsumerResult<HttpResponse> {
        self.dispatcher.dispatch(&self.rules, rule, payload, json).await
    }
}
