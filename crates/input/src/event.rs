/// A raw input event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key: String },
    KeyUp { key: String },
}

impl InputEvent {
    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }

    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown { key: key.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(InputEvent::key_up("j"), InputEvent::KeyUp { key: "j".into() });
        assert!(matches!(InputEvent::key_down("j"), InputEvent::KeyDown { .. }));
    }
}
