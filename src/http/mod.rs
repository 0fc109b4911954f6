//! # HTTP Layer
//!
//! Request/response types shared by orchestration queries and service
//! consumption, plus the transport seam they are sent through.

mod method;
pub mod transport;

pub use method::HttpMethod;
pub use transport::{HttpTransport, ReqwestTransport};

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Body attached to an outbound request
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl RequestBody {
    /// Pick the body for a request.
    ///
    /// Verbs without a body always get `Empty`. When both a form payload and a
    /// JSON body are supplied the form payload is sent.
    pub fn for_method(
        method: HttpMethod,
        payload: Option<Vec<(String, String)>>,
        json: Option<serde_json::Value>,
    ) -> Self {
        if !method.carries_body() {
            return Self::Empty;
        }
        match (payload, json) {
            (Some(pairs), Some(_)) => {
                tracing::debug!(method = %method, "Form payload supplied, dropping JSON body");
                Self::Form(pairs)
            }
            (Some(pairs), None) => Self::Form(pairs),
            (None, Some(value)) => Self::Json(value),
            (None, None) => Self::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A fully resolved request handed to a transport
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
}

/// Raw response returned to callers of `consume`
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Build a response carrying a JSON body
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        let mut response = Self::new(status, value.to_string());
        response.headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        response
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}
