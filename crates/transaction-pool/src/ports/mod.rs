//! Ports layer for the transaction pool.
//!
//! - Inbound (Driving): API exposed to the surrounding node
//! - Outbound (Driven): standardness, chain state, validation, hashing

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
