use super::Engine;
use crate::timers::TimerKind;
use crate::{CONFIG_RETRY_INTERVAL_MS, MAX_CONFIG_ATTEMPTS};
use bus::RebrandEvent;
use dom::HostTree;

#[derive(Debug, Default)]
pub(super) struct Bootstrap {
    failures: u32,
    disabled: bool,
}

impl Bootstrap {
    pub fn reset(&mut self) {
        self.failures = 0;
        self.disabled = false;
    }

    /// Count a failed fetch; returns the attempt number it was.
    pub fn failed(&mut self) -> u32 {
        self.failures += 1;
        self.failures
    }

    pub fn exhausted(&self) -> bool {
        self.failures >= MAX_CONFIG_ATTEMPTS
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

impl Engine {
    /// Bootstrap: load the configuration, retrying on a fixed interval, then
    /// start watching the host. Safe to call again; guards installed by an
    /// earlier run are kept.
    pub fn start<T: HostTree>(&mut self, tree: &mut T) {
        log::info!(target: "rebrand.bootstrap", "starting");
        self.timers.cancel_kind(TimerKind::ConfigRetry);
        self.bootstrap.reset();
        self.load_config(tree);
    }

    pub(super) fn load_config<T: HostTree>(&mut self, tree: &mut T) {
        match self.store.fetch() {
            Ok(config) => {
                self.bootstrap.reset();
                self.install_config(config);
                self.begin_watch(tree);
            }
            Err(err) => {
                let attempt = self.bootstrap.failed();
                self.events.push(RebrandEvent::FetchFailed {
                    attempt,
                    error: err.to_string(),
                });
                if self.bootstrap.exhausted() {
                    log::error!(
                        target: "rebrand.bootstrap",
                        "no configuration after {attempt} attempts ({err}); rebranding disabled"
                    );
                    self.bootstrap.disable();
                    self.events.push(RebrandEvent::Disabled);
                } else {
                    log::warn!(
                        target: "rebrand.bootstrap",
                        "could not load configuration ({err}), retrying in {}s (attempt {attempt}/{MAX_CONFIG_ATTEMPTS})",
                        CONFIG_RETRY_INTERVAL_MS / 1000
                    );
                    self.timers
                        .schedule(self.now, CONFIG_RETRY_INTERVAL_MS, TimerKind::ConfigRetry);
                }
            }
        }
    }

    pub(super) fn retry_config<T: HostTree>(&mut self, tree: &mut T) {
        if !self.bootstrap.is_disabled() {
            self.load_config(tree);
        }
    }
}
