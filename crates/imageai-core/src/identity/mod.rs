//! Identity and navigation boundary.
//!
//! Authentication itself is external. The conversation layer reads the
//! current identity for attribution and asks the gate to end the session on
//! logout; routing between the login and chat surfaces is left to the host.

mod gate;
mod navigation;

pub use gate::{Identity, SessionGate};
pub use navigation::Route;
