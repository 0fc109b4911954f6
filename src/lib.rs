#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Arrowhead Consumer
//!
//! Orchestration-mediated service consumption for Arrowhead consumer systems.
//!
//! ## Overview
//!
//! A consumer never addresses providers directly. It asks the orchestrator to
//! resolve a logical service definition to a concrete provider, binds the
//! result to a locally named consumption rule together with an HTTP verb, and
//! later dispatches calls through that rule over mutual TLS.
//!
//! ## Module Organization
//!
//! - [`system`] - Consumer identity and provider descriptions
//! - [`config`] - Explicit consumer configuration
//! - [`http`] - Verbs, request/response types and the transport seam
//! - [`orchestration`] - Orchestration forms, responses and client
//! - [`rules`] - Consumption rule registry
//! - [`dispatcher`] - Dispatch through a named rule
//! - [`consumer`] - Consumer bootstrap and public API
//! - [`error`] - Structured error handling
//! - [`logging`] - Optional subscriber setup
//!
//! ## Lifecycle of a rule
//!
//! ```text
//! add_orchestration_rule ──resolve ok──▶ BOUND ──set_rule_method──▶ BOUND
//!          │
//!          └──empty / non-200──▶ UNBOUND (error logged, consume refused)
//! ```
//!
//! ## Concurrency
//!
//! Calls complete one HTTP round trip before returning and nothing runs in the
//! background. Rule mutation takes `&mut self`, so sharing a consumer across
//! tasks requires the caller to wrap it in a lock.

pub mod config;
pub mod consumer;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod logging;
pub mod orchestration;
pub mod rules;
pub mod system;

pub use config::ConsumerConfig;
pub use consumer::ConsumerSystem;
pub use dispatcher::{Dispatcher, FormPayload};
pub use error::{ConsumerError, ConsumerResult};
pub use http::{HttpMethod, HttpResponse, HttpTransport, OutboundRequest, RequestBody, ReqwestTransport};
pub use orchestration::{OrchestrationClient, ResolvedService, ORCHESTRATION_RULE};
pub use rules::{ConsumptionRule, RuleState, RuleTable};
pub use system::{ProviderSystem, SystemIdentity};
