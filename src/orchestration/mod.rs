//! # Orchestration
//!
//! Everything needed to turn a logical service definition into a concrete
//! provider: the request form, the decoded response, the statically known
//! orchestration core service, and the client that ties them together.
//!
//! ```text
//! service definition -> OrchestrationForm -> POST {orchestrator}/orchestration
//!                    <- {"response": [..]} -> Vec<ResolvedService>
//! ```

pub mod client;
pub mod core_service;
pub mod form;
pub mod service;

pub use client::{normalize_definition, OrchestrationClient};
pub use core_service::{CoreService, ORCHESTRATION_RULE, ORCHESTRATION_SERVICE};
pub use form::{OrchestrationFlags, OrchestrationForm, ServiceRequirement};
pub use service::{decode_orchestration_response, ResolvedService};
