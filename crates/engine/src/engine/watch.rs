use super::{ApplyOutcome, Engine};
use crate::locate::{self, MAIN_TAG, SIDEBAR_TAG};
use crate::observer::ObserveOptions;
use crate::theme_sync;
use crate::timers::TimerKind;
use crate::{HOST_WAIT_TIMEOUT_MS, NAVIGATION_DELAY_MS, REAPPLY_DEBOUNCE_MS, WATCHER_LIFETIME_MS};
use core_types::{NavigationKind, ObserverKind, WatcherState};
use dom::{HostTree, MutationRecord, NodeKey, TreeWalk};

/// Additions that mean the dashboard re-rendered something worth patching.
fn is_host_component(tag: &str) -> bool {
    tag.starts_with("ha-") || tag.starts_with("hui-") || tag == MAIN_TAG || tag == SIDEBAR_TAG
}

fn introduces_host_components<T: TreeWalk>(tree: &T, records: &[MutationRecord]) -> bool {
    records.iter().any(|record| match record {
        MutationRecord::ChildList { added, .. } => added
            .iter()
            .any(|key| tree.is_element(*key) && tree.tag_name(*key).is_some_and(is_host_component)),
        _ => false,
    })
}

impl Engine {
    // -- Transitions ---

    /// Entry into the watcher once configuration is in hand: apply now, and
    /// either go straight to `Active` or wait for the host to render.
    pub(super) fn begin_watch<T: HostTree>(&mut self, tree: &mut T) -> ApplyOutcome {
        let outcome = self.apply(tree);
        match self.watcher.state() {
            WatcherState::Uninstalled | WatcherState::WaitingForHost if outcome.sidebar_applied() => {
                log::info!(target: "rebrand.watcher", "branding applied immediately");
                self.initialized = true;
                self.activate(tree);
            }
            WatcherState::Uninstalled => {
                self.watcher.transition(WatcherState::WaitingForHost);
                self.emit_state(WatcherState::WaitingForHost);
                self.observe_host(tree);
                self.timers.schedule(self.now, HOST_WAIT_TIMEOUT_MS, TimerKind::HostWaitTimeout);
            }
            _ => {}
        }
        outcome
    }

    fn activate<T: HostTree>(&mut self, tree: &mut T) {
        self.timers.cancel_kind(TimerKind::HostWaitTimeout);
        self.observers.disconnect(tree, ObserverKind::HostWait);
        self.watcher.take_frame();

        let previous = self.watcher.state();
        if !self.watcher.transition(WatcherState::Active) {
            return;
        }
        self.observers.disconnect(tree, ObserverKind::Main);
        self.observe_main(tree);
        self.timers.cancel_kind(TimerKind::WatcherExpiry);
        self.timers.schedule(self.now, WATCHER_LIFETIME_MS, TimerKind::WatcherExpiry);
        if self.watcher.register_navigation_listeners() {
            log::debug!(target: "rebrand.watcher", "navigation listeners registered");
        }
        if previous != WatcherState::Active {
            self.emit_state(WatcherState::Active);
        }
    }

    fn expire<T: HostTree>(&mut self, tree: &mut T) {
        if !self.watcher.transition(WatcherState::Expired) {
            return;
        }
        self.observers.disconnect(tree, ObserverKind::Main);
        self.timers.cancel_kind(TimerKind::Debounce);
        self.timers.cancel_kind(TimerKind::Navigation);
        log::info!(target: "rebrand.watcher", "observer disconnected after {}s", WATCHER_LIFETIME_MS / 1000);
        self.emit_state(WatcherState::Expired);
    }

    // Subtree observation does not cross into shadow trees, so the
    // application's own shadow root is watched alongside it.
    fn observe_host<T: HostTree>(&mut self, tree: &mut T) {
        match locate::app(tree) {
            Some(app) => {
                self.observers
                    .observe(tree, ObserverKind::HostWait, app, ObserveOptions::child_list_subtree());
                if let Some(root) = tree.shadow_root(app) {
                    self.observers.observe(
                        tree,
                        ObserverKind::HostWait,
                        root,
                        ObserveOptions::child_list_subtree(),
                    );
                }
            }
            None => {
                if let Some(body) = tree.body() {
                    self.observers
                        .observe(tree, ObserverKind::HostWait, body, ObserveOptions::child_list());
                }
            }
        }
    }

    /// The narrow scope: direct children of the main view, its shadow root
    /// and the application's shadow root, so a replaced main view is seen too.
    fn observe_main<T: HostTree>(&mut self, tree: &mut T) {
        let targets: Vec<NodeKey> = match (locate::main_view(tree), locate::app_root(tree)) {
            (Some(main), app_root) => std::iter::once(main)
                .chain(tree.shadow_root(main))
                .chain(app_root)
                .collect(),
            (None, Some(app_root)) => vec![app_root],
            (None, None) => tree.body().into_iter().collect(),
        };
        for target in targets {
            self.observers
                .observe(tree, ObserverKind::Main, target, ObserveOptions::child_list());
        }
    }

    // -- Event handlers ---

    pub(super) fn on_tick<T: HostTree>(&mut self, tree: &mut T, now: u64) {
        self.now = self.now.max(now);
        while let Some((_, kind)) = self.timers.pop_due(self.now) {
            self.fire(tree, kind);
        }
    }

    fn fire<T: HostTree>(&mut self, tree: &mut T, kind: TimerKind) {
        log::trace!(target: "rebrand.watcher", "timer {kind:?} at {}ms", self.now);
        match kind {
            TimerKind::ConfigRetry => self.retry_config(tree),
            TimerKind::HostWaitTimeout => {
                self.observers.disconnect(tree, ObserverKind::HostWait);
                self.watcher.take_frame();
                if !self.initialized {
                    log::warn!(
                        target: "rebrand.watcher",
                        "timed out waiting for the sidebar, applying available changes"
                    );
                    self.apply(tree);
                    self.initialized = true;
                }
                self.activate(tree);
            }
            TimerKind::Debounce | TimerKind::Navigation => {
                self.apply(tree);
            }
            TimerKind::WatcherExpiry => self.expire(tree),
        }
    }

    /// Deferred host check: runs after the host's own rendering work.
    pub(super) fn on_frame<T: HostTree>(&mut self, tree: &mut T) {
        if !self.watcher.take_frame() || self.watcher.state() != WatcherState::WaitingForHost {
            return;
        }
        // Disconnect first so the pass does not observe its own writes.
        self.observers.disconnect(tree, ObserverKind::HostWait);
        if self.apply(tree).sidebar_applied() {
            log::info!(target: "rebrand.watcher", "branding applied after the dashboard rendered");
            self.initialized = true;
            self.activate(tree);
        } else {
            self.observe_host(tree);
        }
    }

    pub(super) fn on_mutations<T: HostTree>(&mut self, tree: &mut T) {
        for (kind, records) in self.observers.take_batches(tree) {
            match kind {
                ObserverKind::HostWait => {
                    if self.watcher.request_frame() {
                        log::trace!(target: "rebrand.watcher", "host changed, frame requested");
                    }
                }
                ObserverKind::Main => {
                    if introduces_host_components(tree, &records) {
                        self.timers.cancel_kind(TimerKind::Debounce);
                        self.timers.schedule(self.now, REAPPLY_DEBOUNCE_MS, TimerKind::Debounce);
                    }
                }
                ObserverKind::Title => {
                    if let Some(config) = self.config.clone()
                        && let Err(err) = self.title.apply(tree, &config)
                    {
                        log::debug!(target: "rebrand.patch", "title not applied: {err}");
                    }
                }
                ObserverKind::Theme => self.sync_theme(tree),
            }
        }
    }

    pub(super) fn on_navigation(&mut self, kind: NavigationKind) {
        if !self.watcher.listens_for_navigation() {
            return;
        }
        log::debug!(target: "rebrand.watcher", "{kind:?}, re-applying in {NAVIGATION_DELAY_MS}ms");
        self.timers.schedule(self.now, NAVIGATION_DELAY_MS, TimerKind::Navigation);
    }

    pub(super) fn on_color_scheme_changed<T: HostTree>(&mut self, tree: &mut T) {
        if self.theme_observer {
            self.sync_theme(tree);
        }
    }

    fn sync_theme<T: HostTree>(&mut self, tree: &mut T) {
        let Some(config) = self.config.clone() else {
            return;
        };
        if let Err(err) = theme_sync::sync_logos(tree, &config) {
            log::debug!(target: "rebrand.theme", "logo sync failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::fixtures::{element, home_assistant_shell};

    #[test]
    fn filter_accepts_dashboard_components_only() {
        let (mut dom, shell) = home_assistant_shell();
        let main = shell.main.unwrap();
        let card = element(&mut dom, main.main_shadow, "hui-card", &[]);
        let div = element(&mut dom, main.main_shadow, "div", &[]);
        let records = |added: NodeKey| {
            vec![MutationRecord::ChildList {
                target: main.main_shadow,
                added: vec![added],
                removed: Vec::new(),
            }]
        };
        assert!(introduces_host_components(&dom, &records(card)));
        assert!(!introduces_host_components(&dom, &records(div)));
        assert!(is_host_component("home-assistant-main"));
        assert!(!is_host_component("paper-listbox"));
    }
}
