use std::collections::BTreeMap;

use crate::command::{CommandQueue, SceneCommand};
use crate::event::InputEvent;

/// Maps key-up events to scene commands. Key-down events are ignored.
#[derive(Debug, Clone, Default)]
pub struct KeyBindings {
    on_key_up: BTreeMap<String, SceneCommand>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, key: impl Into<String>, command: SceneCommand) -> Self {
        self.on_key_up.insert(key.into(), command);
        self
    }

    pub fn command_for(&self, event: &InputEvent) -> Option<SceneCommand> {
        match event {
            InputEvent::KeyUp { key } => self.on_key_up.get(key).copied(),
            InputEvent::KeyDown { .. } => None,
        }
    }

    /// Enqueue the command bound to `event`, if any. Returns whether one was.
    pub fn dispatch(&self, event: &InputEvent, queue: &CommandQueue) -> bool {
        match self.command_for(event) {
            Some(command) => {
                queue.push(command);
                true
            }
            None => false,
        }
    }
}
