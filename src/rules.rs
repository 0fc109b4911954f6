//! # Consumption Rule Registry
//!
//! Maps locally chosen rule names to an HTTP verb and, when orchestration
//! succeeded, the service the rule is bound to.
//!
//! Every rule has a verb. A rule may be unbound; dispatching through an
//! unbound rule is refused before any request is made. Rules are never removed.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info};

use crate::error::{ConsumerError, ConsumerResult};
use crate::http::HttpMethod;
use crate::orchestration::ResolvedService;

/// Binding state of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleState {
    /// Orchestration failed or returned no candidates
    Unbound,
    Bound,
}

impl fmt::Display for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "unbound"),
            Self::Bound => write!(f, "bound"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionRule {
    pub method: HttpMethod,
    pub service: Option<ResolvedService>,
}

impl ConsumptionRule {
    pub fn state(&self) -> RuleState {
        match self.service {
            Some(_) => RuleState::Bound,
            None => RuleState::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.service.is_some()
    }
}

/// Rule name to consumption rule
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, ConsumptionRule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a rule, replacing any previous rule of the same name entirely
    pub fn insert(
        &mut self,
        rule: impl Into<String>,
        method: HttpMethod,
        service: Option<ResolvedService>,
    ) -> Option<ConsumptionRule> {
        let rule = rule.into();
        let entry = ConsumptionRule { method, service };
        debug!(rule = %rule, method = %method, state = %entry.state(), "Storing consumption rule");
        self.rules.insert(rule, entry)
    }

    /// Insert an already resolved service without consulting the orchestrator
    pub fn register_pre_resolved(
        &mut self,
        rule: impl Into<String>,
        service: ResolvedService,
        method: HttpMethod,
    ) {
        let rule = rule.into();
        info!(
            rule = %rule,
            method = %method,
            url = %service.url,
            "Registered pre-resolved service"
        );
        self.insert(rule, method, Some(service));
    }

    /// Change the verb of an existing rule, keeping its binding
    pub fn update_method(&mut self, rule: &str, method: HttpMethod) -> ConsumerResult<()> {
        let entry = self
            .rules
            .get_mut(rule)
            .ok_or_else(|| ConsumerError::UnknownRule {
                rule: rule.to_string(),
            })?;
        debug!(rule = %rule, from = %entry.method, to = %method, "Updating rule method");
        entry.method = method;
        Ok(())
    }

    pub fn get(&self, rule: &str) -> Option<&ConsumptionRule> {
        self.rules.get(rule)
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.rules.contains_key(rule)
    }

    pub fn state(&self, rule: &str) -> Option<RuleState> {
        self.rules.get(rule).map(ConsumptionRule::state)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in sorted order
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Pick the service a new rule is bound to.
///
/// The first candidate wins; later candidates are logged and dropped. An empty
/// sequence leaves the rule unbound and is logged as an error.
pub fn select_first(
    service_definition: Option<&str>,
    candidates: Vec<ResolvedService>,
) -> Option<ResolvedService> {
    let mut candidates = candidates.into_iter();
    let Some(selected) = candidates.next() else {
        error!(
            service_definition = ?service_definition,
            "No orchestration rules for service '{}'",
            service_definition.unwrap_or("<stored>")
        );
        return None;
    };

    let ignored: Vec<String> = candidates.map(|s| s.url).collect();
    if !ignored.is_empty() {
        debug!(
            service_definition = ?service_definition,
            selected = %selected.url,
            ignored = ?ignored,
            "Multiple providers resolved, keeping the first"
        );
    }
    Some(selected)
}
