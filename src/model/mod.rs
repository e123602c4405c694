// Model module - Ports and cargo contracts
// Wire shapes shared by the directory and node services

mod contract;
mod port;

pub use contract::*;
pub use port::*;
