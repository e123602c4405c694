// Session module - Client-side state surviving restarts
// Holds which node the user operates and the one-time onboarding flag

mod store;

pub use store::*;
