//! Shared identifiers and spatial types used across the vrscene crates.
//!
//! # Invariants
//! - Handles to host-owned objects are plain copyable ids; holding one never
//!   implies ownership of the object behind it.

mod types;

pub use types::{EntityId, NodeHandle, PhysicsBodyId, Transform};
