use crate::host::ReadinessSignal;

/// Lifecycle of a deferred initialization.
#[derive(Debug)]
pub enum GateState<T> {
    Uninitialized,
    /// Terminal.
    Initialized(T),
}

/// Runs an initializer exactly once, on the first poll that finds the named
/// host subsystem ready.
///
/// While uninitialized, each poll costs one readiness query and nothing else.
/// If the initializer fails the gate stays uninitialized and the next poll
/// tries again; whether to keep polling is the caller's decision.
#[derive(Debug)]
pub struct InitGate<T> {
    subsystem: String,
    state: GateState<T>,
    polls: u64,
    attempts: u64,
}

impl<T> InitGate<T> {
    pub fn new(subsystem: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.into(),
            state: GateState::Uninitialized,
            polls: 0,
            attempts: 0,
        }
    }

    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    pub fn state(&self) -> &GateState<T> {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, GateState::Initialized(_))
    }

    pub fn get(&self) -> Option<&T> {
        match &self.state {
            GateState::Initialized(value) => Some(value),
            GateState::Uninitialized => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            GateState::Initialized(value) => Some(value),
            GateState::Uninitialized => None,
        }
    }

    /// Readiness queries made while uninitialized.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Times the initializer was invoked.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Initialize if needed and possible.
    ///
    /// Returns `Ok(None)` while the subsystem is not ready, `Ok(Some(_))` once
    /// initialized (including the call that initializes), and the
    /// initializer's error if it fails.
    pub fn poll<H, E>(
        &mut self,
        host: &mut H,
        init: impl FnOnce(&mut H) -> Result<T, E>,
    ) -> Result<Option<&mut T>, E>
    where
        H: ReadinessSignal + ?Sized,
    {
        if !self.is_initialized() {
            self.polls += 1;
            if !host.is_ready(&self.subsystem) {
                tracing::trace!(subsystem = %self.subsystem, polls = self.polls, "not ready");
                return Ok(None);
            }
            self.attempts += 1;
            let value = init(host)?;
            tracing::debug!(
                subsystem = %self.subsystem,
                polls = self.polls,
                attempts = self.attempts,
                "initialized"
            );
            self.state = GateState::Initialized(value);
        }
        Ok(self.get_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag(bool);

    impl ReadinessSignal for Flag {
        fn is_ready(&self, subsystem: &str) -> bool {
            assert_eq!(subsystem, "physics");
            self.0
        }
    }

    #[test]
    fn waits_for_readiness_then_initializes_once() {
        let mut gate = InitGate::new("physics");
        let mut flag = Flag(false);
        let mut inits = 0;

        for _ in 0..10 {
            let got = gate
                .poll(&mut flag, |_| {
                    inits += 1;
                    Ok::<_, ()>(42)
                })
                .unwrap();
            assert!(got.is_none());
        }
        assert_eq!(inits, 0);

        flag.0 = true;
        for _ in 0..5 {
            let got = gate
                .poll(&mut flag, |_| {
                    inits += 1;
                    Ok::<_, ()>(42)
                })
                .unwrap();
            assert_eq!(got.copied(), Some(42));
        }
        assert_eq!(inits, 1);
        assert_eq!(gate.polls(), 11);
        assert_eq!(gate.attempts(), 1);
    }

    #[test]
    fn failed_init_stays_uninitialized_and_retries() {
        let mut gate = InitGate::<u32>::new("physics");
        let mut flag = Flag(true);

        let err = gate.poll(&mut flag, |_| Err("boom")).unwrap_err();
        assert_eq!(err, "boom");
        assert!(!gate.is_initialized());

        let got = gate.poll(&mut flag, |_| Ok::<_, &str>(7)).unwrap();
        assert_eq!(got.copied(), Some(7));
        assert_eq!(gate.attempts(), 2);
    }

    #[test]
    fn initialized_gate_skips_readiness() {
        let mut gate = InitGate::new("physics");
        let mut flag = Flag(true);
        gate.poll(&mut flag, |_| Ok::<_, ()>(1)).unwrap();

        flag.0 = false;
        assert_eq!(gate.poll(&mut flag, |_| Ok::<_, ()>(2)).unwrap().copied(), Some(1));
        assert_eq!(gate.polls(), 1);
        assert!(matches!(gate.state(), GateState::Initialized(1)));
    }
}
