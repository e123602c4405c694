// portchain - Console client for the port smart-contract network
//
// Reconstructs a node's contract feed from its raw chain, derives
// settlement eligibility, and sequences create/mine/resolve/fulfill
// against the master directory and per-node blockchain services.

pub mod api;
pub mod chain;
pub mod controller;
pub mod model;
pub mod session;
