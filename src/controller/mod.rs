// Controller module - Contract lifecycle orchestration
// Sequences create/mine/resolve/fulfill against the external ledger and
// derives per-contract settlement eligibility

mod lifecycle;

pub use lifecycle::*;
