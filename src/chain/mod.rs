// Chain module - THE OBSERVED LEDGER
// Block/chain wire shapes and the pure reducer turning a chain snapshot
// into the contract feed

mod flatten;
mod snapshot;

pub use flatten::*;
pub use snapshot::*;
