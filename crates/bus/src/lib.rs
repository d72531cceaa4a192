use core_types::{BrandingConfig, NavigationKind, WatcherState};
use std::sync::mpsc::{self, Receiver, Sender};

/// Everything the host page can tell the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    // Scheduler
    Tick(u64),
    AnimationFrame,
    // Observed DOM has pending mutation records
    Mutations,
    // Window
    Navigation(NavigationKind),
    ColorSchemeChanged,
}

#[derive(Debug)]
pub enum RebrandCommand {
    // Public refresh API
    GetConfig {
        reply: Sender<Option<BrandingConfig>>,
    },
    Refresh,
    ReloadConfig,
    // Host simulation
    Navigate(NavigationKind),
    ColorSchemeChanged {
        dark: bool,
    },
    Advance {
        ms: u64,
    },
    Snapshot {
        cap: usize,
        reply: Sender<Vec<String>>,
    },
    Shutdown,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RebrandEvent {
    // Bootstrap
    ConfigLoaded,
    FetchFailed { attempt: u32, error: String },
    Disabled,
    // Apply passes
    Applied { sidebar: bool },
    // Watcher
    Watcher(WatcherState),
}

pub struct Bus {
    pub cmd_tx: Sender<RebrandCommand>,
    pub evt_rx: Receiver<RebrandEvent>,
    pub evt_tx: Sender<RebrandEvent>, // shareable for runtimes
}

impl Bus {
    /// Returns the bus for the caller and the command receiver a runtime
    /// consumes.
    pub fn new() -> (Self, Receiver<RebrandCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();
        (
            Self {
                cmd_tx,
                evt_rx,
                evt_tx,
            },
            cmd_rx,
        )
    }
}
