//! Developer tooling: read-only views of a world for logs, the CLI, and
//! debugging UIs.
//!
//! # Invariants
//! - Inspection never mutates the world or drains its event log.

pub mod inspector;

pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
