// Node client - Accessor to a single node's blockchain service
//
// A client instance is bound to the address it was connected with; changing
// the active node afterward never redirects an in-flight request.

use super::error::{expect_success, http_client};
use crate::api::ApiError;
use crate::chain::ChainSnapshot;
use crate::model::Port;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// NODE API TRAIT
// ============================================================================

/// Read/write accessor to one node's blockchain service
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Fetch this node's own port record
    async fn port_identity(&self) -> Result<Port, ApiError>;

    /// Fetch the node's full local blockchain, oldest block first
    async fn chain(&self) -> Result<ChainSnapshot, ApiError>;

    /// Ask the node to forge a new block from its pending contracts.
    /// The response body is implementation-defined; callers re-fetch the
    /// chain instead of assuming it grew.
    async fn mine(&self) -> Result<(), ApiError>;

    /// Ask the node to adopt the longest valid peer chain. Outcome is
    /// opaque; callers re-fetch identity and chain afterward.
    async fn resolve_conflicts(&self) -> Result<(), ApiError>;

    /// Request settlement of a contract at this node. Only valid when this
    /// node is the destination and the contract is not already done.
    async fn fulfill_contract(&self, uuid: &Uuid) -> Result<(), ApiError>;
}

/// Binds node clients to an address at command dispatch time
pub trait NodeConnector: Send + Sync {
    type Api: NodeApi;

    /// Create a client fixed to the given address
    fn connect(&self, address: &str) -> Self::Api;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// reqwest-backed node client, fixed to one node address
pub struct HttpNodeClient {
    base: String,
    client: reqwest::Client,
}

impl HttpNodeClient {
    /// Create a standalone client for the given node address
    pub fn new(address: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            base: address.into().trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl NodeApi for HttpNodeClient {
    async fn port_identity(&self) -> Result<Port, ApiError> {
        let url = format!("{}/port", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let port = response.json::<Port>().await?;
        debug!(port = %port.id, balance = port.balance, "fetched port identity");
        Ok(port)
    }

    async fn chain(&self) -> Result<ChainSnapshot, ApiError> {
        let url = format!("{}/chain", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let snapshot = response.json::<ChainSnapshot>().await?;
        debug!(blocks = snapshot.chain.len(), "fetched chain");
        Ok(snapshot)
    }

    async fn mine(&self) -> Result<(), ApiError> {
        let url = format!("{}/mine", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let body = response.text().await.unwrap_or_default();
        debug!(%body, "mine acknowledged");
        Ok(())
    }

    async fn resolve_conflicts(&self) -> Result<(), ApiError> {
        let url = format!("{}/nodes/resolve", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let body = response.text().await.unwrap_or_default();
        debug!(%body, "conflict resolution acknowledged");
        Ok(())
    }

    async fn fulfill_contract(&self, uuid: &Uuid) -> Result<(), ApiError> {
        let url = format!("{}/contract/{}/export_oracle", self.base, uuid);
        expect_success(self.client.post(&url).send().await?).await?;
        debug!(%uuid, "fulfillment exported");
        Ok(())
    }
}

/// Connector producing HTTP node clients that share one reqwest client
pub struct HttpNodeConnector {
    client: reqwest::Client,
}

impl HttpNodeConnector {
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl NodeConnector for HttpNodeConnector {
    type Api = HttpNodeClient;

    fn connect(&self, address: &str) -> HttpNodeClient {
        HttpNodeClient {
            base: address.trim_end_matches('/').to_string(),
            client: self.client.clone(),
        }
    }
}

// ============================================================================
// MOCK IMPLEMENTATION
// ============================================================================

#[derive(Default)]
struct MockNodeState {
    port: Mutex<Option<Port>>,
    chains: Mutex<VecDeque<ChainSnapshot>>,
    failure: Mutex<Option<String>>,
    fulfilled: Mutex<Vec<Uuid>>,
    identity_calls: AtomicUsize,
    chain_calls: AtomicUsize,
    mine_calls: AtomicUsize,
    resolve_calls: AtomicUsize,
    fulfill_calls: AtomicUsize,
}

/// Mock implementation of NodeApi for testing.
///
/// Chain snapshots are consumed as a sequence: each fetch pops the next
/// one, and the last configured snapshot repeats. Clones share state.
#[derive(Clone, Default)]
pub struct MockNodeApi {
    inner: Arc<MockNodeState>,
}

impl MockNodeApi {
    /// Create a mock with no port and an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the port record served by port_identity
    pub fn with_port(self, port: Port) -> Self {
        *self.inner.port.lock().unwrap() = Some(port);
        self
    }

    /// Queue a chain snapshot; the last one queued repeats forever
    pub fn with_chain(self, snapshot: ChainSnapshot) -> Self {
        self.inner.chains.lock().unwrap().push_back(snapshot);
        self
    }

    /// Make every call fail with a server error carrying this message
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.inner.failure.lock().unwrap() = Some(message.into());
        self
    }

    /// Uuids passed to fulfill_contract, in order
    pub fn fulfilled(&self) -> Vec<Uuid> {
        self.inner.fulfilled.lock().unwrap().clone()
    }

    pub fn identity_calls(&self) -> usize {
        self.inner.identity_calls.load(Ordering::SeqCst)
    }

    pub fn chain_calls(&self) -> usize {
        self.inner.chain_calls.load(Ordering::SeqCst)
    }

    pub fn mine_calls(&self) -> usize {
        self.inner.mine_calls.load(Ordering::SeqCst)
    }

    pub fn resolve_calls(&self) -> usize {
        self.inner.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn fulfill_calls(&self) -> usize {
        self.inner.fulfill_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all operations
    pub fn call_count(&self) -> usize {
        self.identity_calls()
            + self.chain_calls()
            + self.mine_calls()
            + self.resolve_calls()
            + self.fulfill_calls()
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match self.inner.failure.lock().unwrap().clone() {
            Some(message) => Err(ApiError::Server {
                status: 500,
                body: message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NodeApi for MockNodeApi {
    async fn port_identity(&self) -> Result<Port, ApiError> {
        self.inner.identity_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner
            .port
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Server {
                status: 500,
                body: "port not found".to_string(),
            })
    }

    async fn chain(&self) -> Result<ChainSnapshot, ApiError> {
        self.inner.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let mut chains = self.inner.chains.lock().unwrap();
        let snapshot = if chains.len() > 1 {
            chains.pop_front()
        } else {
            chains.front().cloned()
        };
        Ok(snapshot.unwrap_or_default())
    }

    async fn mine(&self) -> Result<(), ApiError> {
        self.inner.mine_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }

    async fn resolve_conflicts(&self) -> Result<(), ApiError> {
        self.inner.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()
    }

    async fn fulfill_contract(&self, uuid: &Uuid) -> Result<(), ApiError> {
        self.inner.fulfill_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.fulfilled.lock().unwrap().push(*uuid);
        Ok(())
    }
}

/// Connector handing out clones of one shared mock node, recording every
/// address it was asked to connect to
#[derive(Clone)]
pub struct MockNodeConnector {
    node: MockNodeApi,
    connected: Arc<Mutex<Vec<String>>>,
}

impl MockNodeConnector {
    pub fn new(node: MockNodeApi) -> Self {
        Self {
            node,
            connected: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Addresses passed to connect, in dispatch order
    pub fn connected_addresses(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }
}

impl NodeConnector for MockNodeConnector {
    type Api = MockNodeApi;

    fn connect(&self, address: &str) -> MockNodeApi {
        self.connected.lock().unwrap().push(address.to_string());
        self.node.clone()
    }
}
