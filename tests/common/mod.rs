#![allow(dead_code)]

pub mod recording_transport;

pub use recording_transport::*;

use arrowhead_consumer::{ConsumerConfig, ConsumerSystem, SystemIdentity};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ORCHESTRATOR_ADDRESS: &str = "orch.local:8441";
pub const ORCHESTRATION_URL: &str = "https://orch.local:8441/orchestration";

pub fn consumer_config() -> ConsumerConfig {
    ConsumerConfig::new(
        SystemIdentity::new("thermostat", "10.0.0.7", 8443, "thermostat-fingerprint"),
        ORCHESTRATOR_ADDRESS,
        Duration::from_secs(5),
    )
    .with_credentials("certificates/thermostat.crt", "certificates/thermostat.key")
}

/// A consumer wired to a fresh recording transport
pub fn consumer() -> (ConsumerSystem, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let consumer = ConsumerSystem::with_transport(consumer_config(), transport.clone())
        .expect("consumer should bootstrap");
    (consumer, transport)
}

/// One entry of an orchestrator `response` array
pub fn orchestration_entry(definition: &str, address: &str, port: u16, uri: &str) -> Value {
    json!({
        "provider": {
            "id": 12,
            "systemName": format!("{definition}-provider"),
            "address": address,
            "port": port,
            "authenticationInfo": null
        },
        "service": {"id": 4, "serviceDefinition": definition},
        "serviceUri": uri,
        "secure": "CERTIFICATE",
        "metadata": {},
        "interfaces": [{"id": 1, "interfaceName": "HTTP-SECURE-JSON"}],
        "version": 1,
        "authorizationTokens": null,
        "warnings": []
    })
}

pub fn orchestration_reply(entries: Vec<Value>) -> Value {
    json!({ "response": entries })
}

/// Log output captured from a scoped `tracing` subscriber
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install a subscriber writing into this buffer for the current thread
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buffer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
