//! # Transport Abstraction
//!
//! Every outbound call, whether to the orchestrator or to a provider, goes
//! through [`HttpTransport`]. Production code uses [`ReqwestTransport`], which
//! authenticates with the consumer's client certificate (mutual TLS); tests
//! substitute a scripted transport without touching the network.

use async_trait::async_trait;
use reqwest::{Certificate, Client, Identity};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{HttpResponse, OutboundRequest, RequestBody};
use crate::config::ConsumerConfig;
use crate::error::{ConsumerError, ConsumerResult};

/// Common interface for sending consumer requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Get the transport name for debugging/logging.
    fn transport_name(&self) -> &'static str;

    /// Send a request and return the raw response, whatever its status.
    async fn execute(&self, request: OutboundRequest) -> ConsumerResult<HttpResponse>;
}

/// Mutual-TLS transport backed by `reqwest`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
    verify_server_cert: bool,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("timeout_ms", &self.timeout_ms)
            .field("verify_server_cert", &self.verify_server_cert)
            .finish()
    }
}

impl ReqwestTransport {
    /// Build the client identity from the configured certificate and key files.
    ///
    /// Server certificate verification stays on unless the configuration
    /// explicitly disables it.
    pub fn from_config(config: &ConsumerConfig) -> ConsumerResult<Self> {
        let mut pem = read_credential(&config.certfile)?;
        pem.push(b'\n');
        pem.extend(read_credential(&config.keyfile)?);

        let identity = Identity::from_pem(&pem).map_err(|e| ConsumerError::Credentials {
            path: format!("{} + {}", config.certfile.display(), config.keyfile.display()),
            reason: e.to_string(),
        })?;

        let mut client_builder = Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(format!("arrowhead-consumer/{}", env!("CARGO_PKG_VERSION")));

        if let Some(ca_file) = &config.ca_file {
            let ca_pem = read_credential(ca_file)?;
            let ca = Certificate::from_pem(&ca_pem).map_err(|e| ConsumerError::Credentials {
                path: ca_file.display().to_string(),
                reason: e.to_string(),
            })?;
            client_builder = client_builder.add_root_certificate(ca);
            debug!(ca_file = %ca_file.display(), "Added trusted root certificate");
        }

        if !config.verify_server_cert {
            warn!(
                system_name = %config.system_name,
                "Server certificate verification is DISABLED; connections are open to impersonation"
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ConsumerError::config_error(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(
            certfile = %config.certfile.display(),
            timeout_ms = config.request_timeout_ms,
            verify_server_cert = config.verify_server_cert,
            "Created mutual-TLS transport"
        );

        Ok(Self {
            client,
            timeout_ms: config.request_timeout_ms,
            verify_server_cert: config.verify_server_cert,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    fn transport_name(&self) -> &'static str {
        "reqwest-mtls"
    }

    async fn execute(&self, request: OutboundRequest) -> ConsumerResult<HttpResponse> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.as_str());

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Json(value) => builder.json(value),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn read_credential(path: &Path) -> ConsumerResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| ConsumerError::Credentials {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
