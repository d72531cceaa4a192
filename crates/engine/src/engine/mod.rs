mod apply;
mod bootstrap;
mod watch;

use crate::locate::Locator;
use crate::observer::ObserverRegistry;
use crate::patch::title::TitleGuard;
use crate::text::{CompiledReplacements, WrittenText};
use crate::timers::Timers;
use crate::watcher::Watcher;
use bootstrap::Bootstrap;
use bus::{HostEvent, RebrandEvent};
use core_types::{BrandingConfig, WatcherState};
use dom::HostTree;
use net::ConfigStore;
use std::sync::Arc;

pub use apply::ApplyOutcome;

/// The whole overlay: configuration, observers, timers and guards for one
/// page session.
///
/// The engine never owns the document. Every entry point borrows the tree
/// it should patch, so the same engine runs against a browser binding or the
/// in-memory `dom::HostDom`.
pub struct Engine {
    store: Box<dyn ConfigStore>,
    config: Option<Arc<BrandingConfig>>,
    replacements: CompiledReplacements,
    written_text: WrittenText,
    bootstrap: Bootstrap,

    locator: Locator,
    title: TitleGuard,
    observers: ObserverRegistry,
    timers: Timers,
    watcher: Watcher,
    now: u64,

    // Session-wide guards
    applying: bool,
    initialized: bool,
    title_observer: bool,
    theme_observer: bool,

    apply_passes: u64,
    events: Vec<RebrandEvent>,
}

impl Engine {
    pub fn new(store: impl ConfigStore + 'static) -> Self {
        Self::with_boxed_store(Box::new(store))
    }

    pub fn with_boxed_store(store: Box<dyn ConfigStore>) -> Self {
        Self {
            store,
            config: None,
            replacements: CompiledReplacements::default(),
            written_text: WrittenText::default(),
            bootstrap: Bootstrap::default(),
            locator: Locator::new(),
            title: TitleGuard::default(),
            observers: ObserverRegistry::new(),
            timers: Timers::new(),
            watcher: Watcher::new(),
            now: 0,
            applying: false,
            initialized: false,
            title_observer: false,
            theme_observer: false,
            apply_passes: 0,
            events: Vec::new(),
        }
    }

    // -- Public refresh API ---

    /// The configuration in effect, if one has loaded.
    pub fn config(&self) -> Option<&BrandingConfig> {
        self.config.as_deref()
    }

    /// Force a full apply pass.
    pub fn refresh<T: HostTree>(&mut self, tree: &mut T) -> ApplyOutcome {
        self.apply(tree)
    }

    /// Fetch the configuration again, then apply. A failed fetch keeps the
    /// previous configuration. A successful one also revives an engine that
    /// gave up during bootstrap.
    pub fn reload_config<T: HostTree>(&mut self, tree: &mut T) -> ApplyOutcome {
        match self.store.fetch() {
            Ok(config) => {
                self.timers.cancel_kind(crate::TimerKind::ConfigRetry);
                self.bootstrap.reset();
                self.install_config(config);
                if self.watcher.state() == WatcherState::Uninstalled {
                    return self.begin_watch(tree);
                }
            }
            Err(err) => {
                log::warn!(target: "rebrand.bootstrap", "reload from {} failed: {err}", self.store.describe());
                self.events.push(RebrandEvent::FetchFailed {
                    attempt: 1,
                    error: err.to_string(),
                });
            }
        }
        self.apply(tree)
    }

    // -- Host-facing state ---

    pub fn dispatch<T: HostTree>(&mut self, tree: &mut T, event: HostEvent) {
        match event {
            HostEvent::Tick(now) => self.on_tick(tree, now),
            HostEvent::AnimationFrame => self.on_frame(tree),
            HostEvent::Mutations => self.on_mutations(tree),
            HostEvent::Navigation(kind) => self.on_navigation(kind),
            HostEvent::ColorSchemeChanged => self.on_color_scheme_changed(tree),
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn wants_frame(&self) -> bool {
        self.watcher.frame_pending()
    }

    pub fn has_queued_mutations(&self) -> bool {
        self.observers.has_pending()
    }

    pub fn watcher_state(&self) -> WatcherState {
        self.watcher.state()
    }

    pub fn is_disabled(&self) -> bool {
        self.bootstrap.is_disabled()
    }

    /// Completed apply passes; passes dropped by the re-entrancy guard or for
    /// lack of configuration are not counted.
    pub fn apply_passes(&self) -> u64 {
        self.apply_passes
    }

    pub fn take_events(&mut self) -> Vec<RebrandEvent> {
        std::mem::take(&mut self.events)
    }

    fn install_config(&mut self, config: BrandingConfig) {
        self.replacements = CompiledReplacements::compile(&config.replacements);
        self.written_text.clear();
        self.title.reset();
        log::info!(
            target: "rebrand.bootstrap",
            "configuration loaded from {} ({} replacements)",
            self.store.describe(),
            self.replacements.len()
        );
        self.config = Some(Arc::new(config));
        self.events.push(RebrandEvent::ConfigLoaded);
    }

    fn emit_state(&mut self, state: WatcherState) {
        self.events.push(RebrandEvent::Watcher(state));
    }
}
