use core_types::WatcherState;

/// Re-apply lifecycle: `Uninstalled → WaitingForHost → Active → Expired`.
///
/// Waiting may be skipped when the first apply already found the sidebar.
/// `Expired` is terminal.
#[derive(Debug)]
pub struct Watcher {
    state: WatcherState,
    frame_pending: bool,
    navigation_listeners: bool,
}

impl Default for Watcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Watcher {
    pub fn new() -> Self {
        Self {
            state: WatcherState::Uninstalled,
            frame_pending: false,
            navigation_listeners: false,
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn can_transition(&self, to: WatcherState) -> bool {
        use WatcherState::*;
        matches!(
            (self.state, to),
            (Uninstalled, WaitingForHost)
                | (Uninstalled, Active)
                | (WaitingForHost, WaitingForHost)
                | (WaitingForHost, Active)
                | (Active, Active)
                | (Active, Expired)
        )
    }

    /// Move to `to`; returns `false` and stays put on an illegal edge.
    pub fn transition(&mut self, to: WatcherState) -> bool {
        if !self.can_transition(to) {
            log::debug!(
                target: "rebrand.watcher",
                "ignoring transition {:?} -> {to:?}",
                self.state
            );
            return false;
        }
        if self.state != to {
            log::debug!(target: "rebrand.watcher", "{:?} -> {to:?}", self.state);
        }
        self.state = to;
        true
    }

    /// At most one deferred host check is pending at a time.
    pub fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    pub fn take_frame(&mut self) -> bool {
        std::mem::replace(&mut self.frame_pending, false)
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// One-shot: `true` only the first time.
    pub fn register_navigation_listeners(&mut self) -> bool {
        !std::mem::replace(&mut self.navigation_listeners, true)
    }

    pub fn listens_for_navigation(&self) -> bool {
        self.navigation_listeners && self.state == WatcherState::Active
    }
}
