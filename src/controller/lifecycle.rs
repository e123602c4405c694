// LedgerConsole - Sequences commands against the externally-replicated ledger
//
// The ledger owns all contract state; this controller only observes it.
// Mine and resolve are followed by a fixed refresh sequence (identity,
// chain, flatten). Create and fulfill deliberately are not: propagation is
// asynchronous, and settlement only becomes visible after the next
// mine/resolve on the destination node.

use crate::api::{ApiError, DirectoryApi, NodeApi, NodeConnector};
use crate::chain::flatten;
use crate::model::{
    ContractAnnouncement, ContractDraft, ContractRecord, DraftError, Port, PortRegistration,
};
use crate::session::{SessionError, SessionStore};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Onboarding text shown exactly once per profile
pub const ONBOARDING_HELP: &str = "\
How mining works here:

Ports exchange smart contracts for cargo deals. A created contract is sent
to every port and queued for its next block. To make it part of history,
mine a block on a node and resolve conflicts between nodes, publishing the
new block or adopting the longest chain found.

A contract is fulfilled (confirmed) by its destination port: switch to that
port, fulfill the contract, then mine a block and/or resolve conflicts
again. Once the next block is mined the contract settles automatically,
updating both port balances. Balances can go negative: no sufficiency
checks exist in this network.";

/// Errors from console commands
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("No active port selected; run `use <address>` first")]
    NoActivePort,

    #[error("Contract {uuid} cannot be fulfilled by port {port_id}")]
    NotFulfillable { uuid: Uuid, port_id: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The last refreshed snapshot of the active node: its port record and the
/// flattened, newest-first contract feed
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub port: Port,
    pub contracts: Vec<ContractRecord>,
}

/// Settlement eligibility gate for one contract row.
///
/// True iff the active port is the contract's destination and the contract
/// is not already done. Pure; evaluated per row on every render, never
/// cached. False whenever no port is active.
pub fn can_fulfill(record: &ContractRecord, active_port: Option<&Port>) -> bool {
    match active_port {
        Some(port) => record.to_address == port.id && !record.is_done,
        None => false,
    }
}

/// Contracts settled in `previous` but reported unsettled in `next`.
///
/// `is_done` is monotonic on the external ledger; a non-empty result means
/// the ledger broke that expectation (or served a stale fork).
pub fn settlement_regressions(
    previous: &[ContractRecord],
    next: &[ContractRecord],
) -> Vec<Uuid> {
    previous
        .iter()
        .filter(|old| old.is_done)
        .filter(|old| {
            next.iter()
                .any(|new| new.uuid == old.uuid && !new.is_done)
        })
        .map(|old| old.uuid)
        .collect()
}

/// Client-side contract lifecycle controller.
///
/// Owns the directory accessor, a connector that binds node clients to the
/// address active at dispatch time, and the persistent session.
pub struct LedgerConsole<D, C>
where
    D: DirectoryApi,
    C: NodeConnector,
{
    directory: D,
    nodes: C,
    session: SessionStore,
    view: Option<NodeView>,
}

impl<D, C> LedgerConsole<D, C>
where
    D: DirectoryApi,
    C: NodeConnector,
{
    /// Create a console over the given seams and session
    pub fn new(directory: D, nodes: C, session: SessionStore) -> Self {
        Self {
            directory,
            nodes,
            session,
            view: None,
        }
    }

    /// The last refreshed view, if any command has refreshed yet
    pub fn view(&self) -> Option<&NodeView> {
        self.view.as_ref()
    }

    /// Persist the given address as the active node and drop any stale view
    pub fn select_node(&mut self, address: &str) -> Result<(), ConsoleError> {
        self.session.set_active_node(address)?;
        self.view = None;
        info!(%address, "active node selected");
        Ok(())
    }

    /// The active node address, if one was ever selected
    pub fn active_node(&self) -> Result<Option<String>, ConsoleError> {
        Ok(self.session.active_node()?)
    }

    /// Return the onboarding text exactly once per profile
    pub fn onboarding_help(&self) -> Result<Option<&'static str>, ConsoleError> {
        if self.session.help_shown()? {
            return Ok(None);
        }
        self.session.mark_help_shown()?;
        Ok(Some(ONBOARDING_HELP))
    }

    /// Bind a node client to the currently active address.
    ///
    /// Fails with NoActivePort before anything reaches the network.
    fn connected_node(&self) -> Result<C::Api, ConsoleError> {
        let address = self
            .session
            .active_node()?
            .ok_or(ConsoleError::NoActivePort)?;
        Ok(self.nodes.connect(&address))
    }

    /// Re-fetch port identity and chain, re-flatten, and replace the view
    /// wholesale. The previous view is only consulted for the settlement
    /// monotonicity warning.
    pub async fn refresh(&mut self) -> Result<NodeView, ConsoleError> {
        let node = self.connected_node()?;
        self.refresh_with(&node).await
    }

    async fn refresh_with(&mut self, node: &C::Api) -> Result<NodeView, ConsoleError> {
        let port = node.port_identity().await?;
        let snapshot = node.chain().await?;
        let contracts = flatten(&snapshot.chain);

        if let Some(previous) = &self.view {
            for uuid in settlement_regressions(&previous.contracts, &contracts) {
                warn!(%uuid, "settled contract reported unsettled by the ledger");
            }
        }

        let view = NodeView { port, contracts };
        self.view = Some(view.clone());
        Ok(view)
    }

    /// List all registered ports from the directory
    pub async fn list_ports(&self) -> Result<Vec<Port>, ConsoleError> {
        Ok(self.directory.list_ports().await?)
    }

    /// The network-wide contract log, newest first (display order only)
    pub async fn latest_contracts(&self) -> Result<Vec<ContractAnnouncement>, ConsoleError> {
        let mut log = self.directory.list_contracts().await?;
        log.reverse();
        Ok(log)
    }

    /// Register a new port with the directory
    pub async fn register_port(
        &self,
        registration: &PortRegistration,
    ) -> Result<(), ConsoleError> {
        self.directory.register_port(registration).await?;
        info!(port = %registration.id, "port registered with directory");
        Ok(())
    }

    /// Create a contract from the active port to `port_to`.
    ///
    /// Validates locally (origin != destination, cost already coerced
    /// non-negative) and delegates to the directory. Does not refresh:
    /// propagation to the nodes is asynchronous and outside this client's
    /// control.
    pub async fn create_contract(
        &mut self,
        port_to: &str,
        cost: u64,
    ) -> Result<Option<ContractAnnouncement>, ConsoleError> {
        let node = self.connected_node()?;
        let origin = match &self.view {
            Some(view) => view.port.clone(),
            None => node.port_identity().await?,
        };

        let draft = ContractDraft::new(origin.id, port_to, cost)?;
        let created = self.directory.create_contract(&draft).await?;
        info!(port_to, cost, "contract submitted to the directory");
        Ok(created)
    }

    /// Mine a block on the active node, then refresh
    pub async fn mine(&mut self) -> Result<NodeView, ConsoleError> {
        let node = self.connected_node()?;
        node.mine().await?;
        info!("block mining requested");
        self.refresh_with(&node).await
    }

    /// Resolve conflicts on the active node, then refresh
    pub async fn resolve(&mut self) -> Result<NodeView, ConsoleError> {
        let node = self.connected_node()?;
        node.resolve_conflicts().await?;
        info!("conflict resolution requested");
        self.refresh_with(&node).await
    }

    /// Fulfill a contract addressed to the active port.
    ///
    /// Guarded by the eligibility gate against the current view (refreshing
    /// first when none exists). Deliberately does not refresh afterward:
    /// settlement becomes visible only after the next mine/resolve.
    pub async fn fulfill(&mut self, uuid: &Uuid) -> Result<(), ConsoleError> {
        let node = self.connected_node()?;
        let view = match self.view.clone() {
            Some(view) => view,
            None => self.refresh_with(&node).await?,
        };

        let eligible = view
            .contracts
            .iter()
            .find(|record| record.uuid == *uuid)
            .map(|record| can_fulfill(record, Some(&view.port)))
            .unwrap_or(false);

        if !eligible {
            return Err(ConsoleError::NotFulfillable {
                uuid: *uuid,
                port_id: view.port.id,
            });
        }

        node.fulfill_contract(uuid).await?;
        info!(%uuid, "contract fulfilled; mine or resolve to record settlement");
        Ok(())
    }
}
