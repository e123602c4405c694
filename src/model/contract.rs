// Contract - A cargo deal between two ports
//
// Three shapes travel the wire:
// - ContractDraft: the create request (validated locally before sending)
// - ContractAnnouncement: the directory's network-wide contract log entry
// - ContractRecord: the on-chain transaction, carrying settlement state

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors from building or coercing a contract draft
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DraftError {
    #[error("Missing origin port")]
    MissingOrigin,

    #[error("Missing destination port")]
    MissingDestination,

    #[error("Origin and destination cannot be the same port: {0}")]
    SamePort(String),

    #[error("Cost is not an integer: {0}")]
    CostNotAnInteger(String),

    #[error("Cost cannot be negative: {0}")]
    NegativeCost(i64),
}

/// Coerce user-supplied cost input to a non-negative integer.
///
/// The network has no upper bound and no balance-sufficiency check;
/// the only local rule is `cost >= 0`.
pub fn parse_cost(input: &str) -> Result<u64, DraftError> {
    let value: i64 = input
        .trim()
        .parse()
        .map_err(|_| DraftError::CostNotAnInteger(input.trim().to_string()))?;

    if value < 0 {
        return Err(DraftError::NegativeCost(value));
    }

    Ok(value as u64)
}

/// A locally validated contract creation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContractDraft {
    port_from: String,
    port_to: String,
    cost: u64,
}

impl ContractDraft {
    /// Build a draft, enforcing the local rules: both ports present,
    /// origin != destination.
    pub fn new(
        port_from: impl Into<String>,
        port_to: impl Into<String>,
        cost: u64,
    ) -> Result<Self, DraftError> {
        let port_from = port_from.into();
        let port_to = port_to.into();

        if port_from.is_empty() {
            return Err(DraftError::MissingOrigin);
        }
        if port_to.is_empty() {
            return Err(DraftError::MissingDestination);
        }
        if port_from == port_to {
            return Err(DraftError::SamePort(port_from));
        }

        Ok(Self {
            port_from,
            port_to,
            cost,
        })
    }

    /// Get the origin port id
    pub fn port_from(&self) -> &str {
        &self.port_from
    }

    /// Get the destination port id
    pub fn port_to(&self) -> &str {
        &self.port_to
    }

    /// Get the cost
    pub fn cost(&self) -> u64 {
        self.cost
    }
}

/// A contract as recorded in the directory's network-wide log.
///
/// The directory stores the creation shape plus the server-assigned
/// uuid and timestamp; settlement state lives only on the chains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAnnouncement {
    pub uuid: Uuid,
    pub port_from: String,
    pub port_to: String,
    pub cost: u64,
    pub timestamp: i64,
}

/// A contract transaction as serialized inside a block.
///
/// `from_address` and `to_address` carry port ids, not network addresses;
/// the naming follows the node service's wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub uuid: Uuid,
    pub from_address: String,
    pub to_address: String,
    pub cost: u64,
    pub timestamp: i64,
    /// Monotonic: false -> true exactly once, flipped by the destination
    /// node upon settlement. Never reverses.
    #[serde(default)]
    pub is_done: bool,
}

impl ContractRecord {
    /// Observed lifecycle state of this record
    pub fn status(&self) -> ContractStatus {
        if self.is_done {
            ContractStatus::Settled
        } else {
            ContractStatus::Created
        }
    }
}

/// The two observable contract states. There is no cancellation and
/// no expiry; ownership of the transition is the external ledger's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Created,
    Settled,
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Created => write!(f, "created"),
            ContractStatus::Settled => write!(f, "settled"),
        }
    }
}
