use crate::input::{Input, KeyCode};

/// Where the app is between window creation & exit
///
/// States only move forward; closing is reachable from anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Uninitialized,
    ContextReady,
    ResourcesLoaded,
    Running,
    Closing,
}

impl LifecycleState {
    fn next(self) -> Option<Self> {
        use LifecycleState::*;
        match self {
            Uninitialized => Some(ContextReady),
            ContextReady => Some(ResourcesLoaded),
            ResourcesLoaded => Some(Running),
            Running => Some(Closing),
            Closing => None,
        }
    }
}

#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
        }
    }
}

impl Lifecycle {
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Moves to `to` if it directly follows the current state
    pub fn advance(&mut self, to: LifecycleState) -> bool {
        if self.state.next() != Some(to) {
            log::warn!("ignoring lifecycle transition {:?} -> {to:?}", self.state);
            return false;
        }
        log::debug!("lifecycle {:?} -> {to:?}", self.state);
        self.state = to;
        true
    }

    pub fn request_close(&mut self) {
        if self.state != LifecycleState::Closing {
            log::info!("close requested");
            self.state = LifecycleState::Closing;
        }
    }

    pub fn is_closing(&self) -> bool {
        self.state == LifecycleState::Closing
    }

    /// Samples input at the top of a frame; returns true once the loop should stop
    ///
    /// A press & release between two frames still counts as a press
    pub fn poll_input(&mut self, input: &Input, close_key: KeyCode) -> bool {
        if input.key_held(close_key) || input.key_released(close_key) {
            self.request_close();
        }
        self.is_closing()
    }
}
