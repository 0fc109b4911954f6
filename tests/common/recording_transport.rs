use arrowhead_consumer::{
    ConsumerError, ConsumerResult, HttpResponse, HttpTransport, OutboundRequest,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Scripted outcome for one request to a URL
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Respond(HttpResponse),
    /// Simulates a connection/TLS failure
    Fail(String),
}

/// Transport double that records every request and replays scripted replies
///
/// Replies are queued per URL. A URL with nothing queued answers 404.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    replies: Mutex<HashMap<String, VecDeque<ScriptedReply>>>,
    requests: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request to `url`
    pub fn respond(&self, url: &str, response: HttpResponse) {
        self.push(url, ScriptedReply::Respond(response));
    }

    /// Queue a JSON response for the next request to `url`
    pub fn respond_json(&self, url: &str, status: u16, body: serde_json::Value) {
        self.respond(url, HttpResponse::json_body(status, &body));
    }

    /// Make the next request to `url` fail at the transport level
    pub fn fail(&self, url: &str, reason: &str) {
        self.push(url, ScriptedReply::Fail(reason.to_string()));
    }

    fn push(&self, url: &str, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, url: &str) -> Vec<OutboundRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url == url)
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    fn transport_name(&self) -> &'static str {
        "recording"
    }

    async fn execute(&self, request: OutboundRequest) -> ConsumerResult<HttpResponse> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&url)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(reason)) => Err(ConsumerError::Internal(reason)),
            None => Ok(HttpResponse::new(404, format!("no route for {url}"))),
        }
    }
}
