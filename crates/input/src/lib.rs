//! Input: host key events mapped to scene commands.
//!
//! Input arrives outside the frame loop. Handlers never touch the world;
//! they enqueue [`SceneCommand`]s that the frame driver drains at the start
//! of its next tick.
//!
//! # Invariants
//! - Commands are applied in the order they were enqueued.
//! - Draining is the only way commands leave the queue.

pub mod binding;
pub mod command;
pub mod event;

pub use binding::KeyBindings;
pub use command::{CommandQueue, SceneCommand};
pub use event::InputEvent;
