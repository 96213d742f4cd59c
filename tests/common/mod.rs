//! Shared utilities for integration tests: a mutable in-memory route store,
//! a programmable mock invoker, and a gateway spawn helper.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::{TcpListener, TcpStream};

use lambda_gateway::config::GatewayConfig;
use lambda_gateway::error::InvokeError;
use lambda_gateway::http::GatewayServer;
use lambda_gateway::invoke::{FunctionInvoker, InvocationEnvelope, RawInvocation};
use lambda_gateway::routes::{RouteCache, RouteStore, StoreError, StoredRoute};

/// In-memory route store whose contents can change between refreshes.
pub struct MemoryStore {
    records: Mutex<Vec<StoredRoute>>,
}

impl MemoryStore {
    pub fn with(records: Vec<StoredRoute>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
        })
    }

    pub fn set(&self, records: Vec<StoredRoute>) {
        *self.records.lock().unwrap() = records;
    }
}

#[async_trait]
impl RouteStore for MemoryStore {
    async fn fetch_enabled(&self) -> Result<Vec<StoredRoute>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.enabled)
            .cloned()
            .collect())
    }
}

type InvokerFn = dyn Fn(&InvocationEnvelope) -> Result<RawInvocation, InvokeError> + Send + Sync;

/// Programmable invoker that records every call it receives.
pub struct MockInvoker {
    calls: AtomicU32,
    last_envelope: Mutex<Option<InvocationEnvelope>>,
    respond: Box<InvokerFn>,
}

impl MockInvoker {
    pub fn returning<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&InvocationEnvelope) -> Result<RawInvocation, InvokeError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            last_envelope: Mutex::new(None),
            respond: Box::new(respond),
        })
    }

    /// Invoker answering every Sync call with the given structured result.
    pub fn with_payload(payload: &str) -> Arc<Self> {
        let payload = payload.as_bytes().to_vec();
        Self::returning(move |_| {
            Ok(RawInvocation {
                payload: payload.clone(),
                ..Default::default()
            })
        })
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn last_envelope(&self) -> Option<InvocationEnvelope> {
        self.last_envelope.lock().unwrap().clone()
    }
}

#[async_trait]
impl FunctionInvoker for MockInvoker {
    async fn invoke(&self, envelope: &InvocationEnvelope) -> Result<RawInvocation, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_envelope.lock().unwrap() = Some(envelope.clone());
        (self.respond)(envelope)
    }
}

/// Stored-route literal with sensible defaults for tests.
pub fn stored_route(id: &str, priority: i64, path: &str, target: &str, mode: &str) -> StoredRoute {
    serde_json::from_value(serde_json::json!({
        "Id": id,
        "Enabled": true,
        "MatchMethods": ["*"],
        "MatchHosts": ["*"],
        "MatchPath": path,
        "Priority": priority,
        "LambdaFunctionName": target,
        "LambdaInvocationType": mode,
    }))
    .unwrap()
}

/// Spawn a gateway on an ephemeral loopback port and wait until it accepts.
pub async fn spawn_gateway(
    cache: Arc<RouteCache>,
    invoker: Arc<dyn FunctionInvoker>,
    max_body_bytes: usize,
) -> SocketAddr {
    let mut config = GatewayConfig::default();
    config.limits.max_body_bytes = max_body_bytes;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = GatewayServer::new(&config, cache, invoker);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_ok() {
            return addr;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("gateway did not start on {addr}");
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
