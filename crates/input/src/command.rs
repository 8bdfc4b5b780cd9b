use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A deferred mutation of the scene, applied by the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// Create a physics-enabled, holdable box under the scene root.
    SpawnBox,
}

/// FIFO of scene commands shared between input handlers and the frame driver.
///
/// Clones share the same queue, so a handler can keep its own copy. The
/// frame loop is single-threaded, hence `Rc<RefCell<_>>`.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    inner: Rc<RefCell<VecDeque<SceneCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: SceneCommand) {
        tracing::trace!(?command, "command queued");
        self.inner.borrow_mut().push_back(command);
    }

    /// Take every queued command, oldest first.
    pub fn drain(&self) -> Vec<SceneCommand> {
        self.inner.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}
