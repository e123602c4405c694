// Directory client - Accessor to the master service
// Lists ports, lists the network-wide contract log, creates contracts,
// and registers new ports

use super::error::{expect_success, http_client};
use crate::api::ApiError;
use crate::model::{ContractAnnouncement, ContractDraft, Port, PortRegistration};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ============================================================================
// DIRECTORY API TRAIT
// ============================================================================

/// Read/write accessor to the master directory service
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// List all registered ports, in server-defined order
    async fn list_ports(&self) -> Result<Vec<Port>, ApiError>;

    /// Fetch the network-wide contract log, oldest first
    async fn list_contracts(&self) -> Result<Vec<ContractAnnouncement>, ApiError>;

    /// Submit a new contract. Returns the created announcement when the
    /// server echoes one; the reference master only acknowledges.
    async fn create_contract(
        &self,
        draft: &ContractDraft,
    ) -> Result<Option<ContractAnnouncement>, ApiError>;

    /// Register a port with the directory. The master re-broadcasts the
    /// node list and triggers conflict resolution on every node.
    async fn register_port(&self, registration: &PortRegistration) -> Result<(), ApiError>;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// reqwest-backed directory client, targeting the configured master address
pub struct HttpDirectoryClient {
    base: String,
    client: reqwest::Client,
}

impl HttpDirectoryClient {
    /// Create a client for the given master base address
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            base: base.into().trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_ports(&self) -> Result<Vec<Port>, ApiError> {
        let url = format!("{}/get_nodes", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let ports = response.json::<Vec<Port>>().await?;
        debug!(count = ports.len(), "fetched port directory");
        Ok(ports)
    }

    async fn list_contracts(&self) -> Result<Vec<ContractAnnouncement>, ApiError> {
        let url = format!("{}/get_contracts", self.base);
        let response = expect_success(self.client.get(&url).send().await?).await?;
        let contracts = response.json::<Vec<ContractAnnouncement>>().await?;
        debug!(count = contracts.len(), "fetched contract log");
        Ok(contracts)
    }

    async fn create_contract(
        &self,
        draft: &ContractDraft,
    ) -> Result<Option<ContractAnnouncement>, ApiError> {
        let url = format!("{}/create_contract", self.base);
        let response = expect_success(self.client.post(&url).json(draft).send().await?).await?;

        // The reference master replies {"status": "OK"}; richer servers may
        // echo the created contract. Accept both.
        let body = response.json::<serde_json::Value>().await?;
        let created = serde_json::from_value::<ContractAnnouncement>(body).ok();
        debug!(echoed = created.is_some(), "contract submitted");
        Ok(created)
    }

    async fn register_port(&self, registration: &PortRegistration) -> Result<(), ApiError> {
        let url = format!("{}/register_node", self.base);
        expect_success(self.client.post(&url).json(registration).send().await?).await?;
        debug!(port = %registration.id, "port registered");
        Ok(())
    }
}

// ============================================================================
// MOCK IMPLEMENTATION
// ============================================================================

#[derive(Default)]
struct MockDirectoryState {
    ports: Mutex<Vec<Port>>,
    contracts: Mutex<Vec<ContractAnnouncement>>,
    created_echo: Mutex<Option<ContractAnnouncement>>,
    failure: Mutex<Option<String>>,
    submitted: Mutex<Vec<ContractDraft>>,
    registered: Mutex<Vec<PortRegistration>>,
    list_ports_calls: AtomicUsize,
    list_contracts_calls: AtomicUsize,
    create_calls: AtomicUsize,
    register_calls: AtomicUsize,
}

/// Mock implementation of DirectoryApi for testing.
///
/// Clones share state, so a test can keep a handle while the controller
/// owns another.
#[derive(Clone, Default)]
pub struct MockDirectoryApi {
    inner: Arc<MockDirectoryState>,
}

impl MockDirectoryApi {
    /// Create a mock with no ports and an empty contract log
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the port directory
    pub fn with_ports(self, ports: Vec<Port>) -> Self {
        *self.inner.ports.lock().unwrap() = ports;
        self
    }

    /// Seed the contract log (oldest first, as the server returns it)
    pub fn with_contracts(self, contracts: Vec<ContractAnnouncement>) -> Self {
        *self.inner.contracts.lock().unwrap() = contracts;
        self
    }

    /// Make create_contract echo the given announcement
    pub fn with_created_echo(self, announcement: ContractAnnouncement) -> Self {
        *self.inner.created_echo.lock().unwrap() = Some(announcement);
        self
    }

    /// Make every call fail with a server error carrying this message
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        *self.inner.failure.lock().unwrap() = Some(message.into());
        self
    }

    /// Drafts submitted through create_contract, in order
    pub fn submitted_drafts(&self) -> Vec<ContractDraft> {
        self.inner.submitted.lock().unwrap().clone()
    }

    /// Registrations submitted through register_port, in order
    pub fn registrations(&self) -> Vec<PortRegistration> {
        self.inner.registered.lock().unwrap().clone()
    }

    /// Total calls across all operations
    pub fn call_count(&self) -> usize {
        self.inner.list_ports_calls.load(Ordering::SeqCst)
            + self.inner.list_contracts_calls.load(Ordering::SeqCst)
            + self.inner.create_calls.load(Ordering::SeqCst)
            + self.inner.register_calls.load(Ordering::SeqCst)
    }

    /// Number of create_contract calls
    pub fn create_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::SeqCst)
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
impl DirectoryApi for MockDirectoryApi {
    async fn list_ports(&self) -> Result<Vec<Port>, ApiError> {
        self.inner.list_ports_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.inner.ports.lock().unwrap().clone())
    }

    async fn list_contracts(&self) -> Result<Vec<ContractAnnouncement>, ApiError> {
        self.inner
            .list_contracts_calls
            .fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.inner.contracts.lock().unwrap().clone())
    }

    async fn create_contract(
        &self,
        draft: &ContractDraft,
    ) -> Result<Option<ContractAnnouncement>, ApiError> {
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.submitted.lock().unwrap().push(draft.clone());
        Ok(self.inner.created_echo.lock().unwrap().clone())
    }

    async fn register_port(&self, registration: &PortRegistration) -> Result<(), ApiError> {
        self.inner.register_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner
            .registered
            .lock()
            .unwrap()
            .push(registration.clone());
        Ok(())
    }
}
