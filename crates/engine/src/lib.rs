//! Branding overlay engine for the dashboard.
//!
//! The engine is written against `dom::HostTree`, never a concrete document,
//! and is driven entirely through [`Engine::dispatch`]. [`Session`] pairs it
//! with an in-memory document and a virtual clock.

mod engine;
mod locate;
mod observer;
mod patch;
mod session;
mod theme_sync;
mod timers;
mod watcher;

pub mod text;

pub use crate::engine::{ApplyOutcome, Engine};
pub use crate::observer::{ObserveOptions, ObserverRegistry};
pub use crate::patch::markers;
pub use crate::session::{Session, SessionError};
pub use crate::text::{CompiledReplacements, SubstitutionReport, WrittenText};
pub use crate::timers::{TimerKind, Timers};
pub use crate::watcher::Watcher;

// Bootstrap
pub const CONFIG_RETRY_INTERVAL_MS: u64 = 2_000;
pub const MAX_CONFIG_ATTEMPTS: u32 = 5;

// Watcher
pub const HOST_WAIT_TIMEOUT_MS: u64 = 10_000;
pub const REAPPLY_DEBOUNCE_MS: u64 = 300;
pub const NAVIGATION_DELAY_MS: u64 = 100;
pub const WATCHER_LIFETIME_MS: u64 = 300_000;

// Text substitution
pub const MAX_SHADOW_DEPTH: usize = 10;
