use crate::engine::{ApplyOutcome, Engine};
use bus::HostEvent;
use core_types::NavigationKind;
use dom::HostDom;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Mutation delivery kept producing more work; some observer is
    /// re-triggering itself.
    Runaway { steps: usize },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Runaway { steps } => {
                write!(f, "host did not settle after {steps} callback rounds")
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// An engine bound to an in-memory document and a virtual clock.
///
/// After every event the session drains follow-up work the way a browser
/// event loop would: pending mutation records first, then a requested
/// animation frame, until nothing is left. Timers only fire through
/// [`Session::advance`].
pub struct Session {
    dom: HostDom,
    engine: Engine,
    step_limit: usize,
}

impl Session {
    pub const DEFAULT_STEP_LIMIT: usize = 64;

    pub fn new(dom: HostDom, engine: Engine) -> Self {
        Self {
            dom,
            engine,
            step_limit: Self::DEFAULT_STEP_LIMIT,
        }
    }

    /// Callback rounds allowed per settle before giving up.
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn dom(&self) -> &HostDom {
        &self.dom
    }

    /// Host-side edits; they reach the engine on the next settle.
    pub fn dom_mut(&mut self) -> &mut HostDom {
        &mut self.dom
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn now(&self) -> u64 {
        self.engine.now()
    }

    pub fn start(&mut self) -> Result<usize, SessionError> {
        self.engine.start(&mut self.dom);
        self.run_until_idle()
    }

    pub fn dispatch(&mut self, event: HostEvent) -> Result<usize, SessionError> {
        self.engine.dispatch(&mut self.dom, event);
        self.run_until_idle()
    }

    /// Deliver mutations and frames until the host is quiet. Returns the
    /// number of callback rounds it took.
    pub fn run_until_idle(&mut self) -> Result<usize, SessionError> {
        let mut steps = 0;
        loop {
            let event = if self.dom.pending_records() > 0 || self.engine.has_queued_mutations() {
                HostEvent::Mutations
            } else if self.engine.wants_frame() {
                HostEvent::AnimationFrame
            } else {
                return Ok(steps);
            };
            steps += 1;
            if steps > self.step_limit {
                return Err(SessionError::Runaway { steps });
            }
            self.engine.dispatch(&mut self.dom, event);
        }
    }

    /// Move the clock forward by `ms`, firing every timer that comes due on
    /// the way at its own instant.
    pub fn advance(&mut self, ms: u64) -> Result<usize, SessionError> {
        let target = self.engine.now().saturating_add(ms);
        let mut steps = self.run_until_idle()?;
        while let Some(due) = self.engine.next_timer_due().filter(|due| *due <= target) {
            self.engine.dispatch(&mut self.dom, HostEvent::Tick(due));
            steps += self.run_until_idle()?;
        }
        self.engine.dispatch(&mut self.dom, HostEvent::Tick(target));
        steps += self.run_until_idle()?;
        Ok(steps)
    }

    pub fn refresh(&mut self) -> Result<ApplyOutcome, SessionError> {
        let outcome = self.engine.refresh(&mut self.dom);
        self.run_until_idle()?;
        Ok(outcome)
    }

    pub fn reload_config(&mut self) -> Result<ApplyOutcome, SessionError> {
        let outcome = self.engine.reload_config(&mut self.dom);
        self.run_until_idle()?;
        Ok(outcome)
    }

    pub fn navigate(&mut self, kind: NavigationKind) -> Result<usize, SessionError> {
        self.dispatch(HostEvent::Navigation(kind))
    }

    /// Flip the environment's color-scheme preference and notify the engine.
    pub fn set_prefers_dark(&mut self, dark: bool) -> Result<usize, SessionError> {
        self.dom.set_prefers_dark(dark);
        self.dispatch(HostEvent::ColorSchemeChanged)
    }

    pub fn outline(&self, cap: usize) -> Vec<String> {
        dom::outline::outline(&self.dom, cap)
    }
}
