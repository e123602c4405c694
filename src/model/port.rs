// Port - A participant in the network (a digital seaport)

use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered port: identity plus its settlement balance.
///
/// The balance is owned by the external ledger and changes only when a
/// mined block settles contracts. It may go negative; the network performs
/// no sufficiency checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Network-unique port identifier (e.g. "ESLCG001")
    pub id: String,
    /// Human-readable name (e.g. "A Coruna")
    pub name: String,
    /// Base address of the port's node service
    pub address: String,
    /// Settlement balance, mutated only by the external ledger
    #[serde(default)]
    pub balance: i64,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Registration payload for adding a port to the directory.
///
/// The directory assigns no fields of its own; the balance is seeded by
/// the node service itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRegistration {
    pub id: String,
    pub name: String,
    pub address: String,
}
