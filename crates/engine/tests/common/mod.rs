#![allow(dead_code)]

use core_types::BrandingConfig;
use dom::HostDom;
use engine::{Engine, Session};
use net::{ConfigStore, FetchError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails a fixed number of times, then serves `config` forever.
pub struct ScriptedStore {
    failures_left: usize,
    config: BrandingConfig,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStore {
    pub fn new(failures: usize, config: BrandingConfig) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = Self {
            failures_left: failures,
            config,
            calls: Arc::clone(&calls),
        };
        (store, calls)
    }
}

impl ConfigStore for ScriptedStore {
    fn fetch(&mut self) -> Result<BrandingConfig, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(FetchError::Status(503));
        }
        Ok(self.config.clone())
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Serves each configuration in turn, then keeps serving the last one.
pub struct SequenceStore {
    configs: Vec<BrandingConfig>,
    served: usize,
}

impl SequenceStore {
    pub fn new(configs: Vec<BrandingConfig>) -> Self {
        Self { configs, served: 0 }
    }
}

impl ConfigStore for SequenceStore {
    fn fetch(&mut self) -> Result<BrandingConfig, FetchError> {
        let index = self.served.min(self.configs.len().saturating_sub(1));
        self.served += 1;
        self.configs
            .get(index)
            .cloned()
            .ok_or_else(|| FetchError::Network("nothing to serve".to_string()))
    }
}

pub fn config(json: serde_json::Value) -> BrandingConfig {
    serde_json::from_value(json).expect("valid branding config")
}

pub fn session(dom: HostDom, config: BrandingConfig) -> Session {
    let (store, _) = ScriptedStore::new(0, config);
    Session::new(dom, Engine::new(store))
}

pub fn started(dom: HostDom, config: BrandingConfig) -> Session {
    let mut session = session(dom, config);
    session.start().expect("session settles");
    session
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
