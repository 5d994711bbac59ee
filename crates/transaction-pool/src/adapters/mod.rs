//! Adapters layer for the transaction pool.
//!
//! - `hasher`: SHA-256 implementation of the `ContentHasher` port

pub mod hasher;

pub use hasher::Sha256ContentHasher;
