mod common;

use common::{config, started};
use dom::TreeWalk;
use dom::fixtures::shadow_chain;
use engine::MAX_SHADOW_DEPTH;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::sync::Mutex;

static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

struct Capture;

impl Log for Capture {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata())
            && let Ok(mut warnings) = WARNINGS.lock()
        {
            warnings.push(format!("{}: {}", record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: Capture = Capture;

#[test]
fn substitution_stops_at_depth_bound() {
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Warn));

    let (dom, texts) = shadow_chain(MAX_SHADOW_DEPTH + 2, "Home Assistant");
    let session = started(dom, config(json!({ "replacements": { "Home Assistant": "Acme" } })));

    for (level, key) in texts.iter().enumerate() {
        let expected = if level < MAX_SHADOW_DEPTH { "Acme" } else { "Home Assistant" };
        assert_eq!(session.dom().text(*key), Some(expected), "level {level}");
    }

    let warnings = WARNINGS.lock().unwrap();
    assert!(
        warnings.iter().any(|w| w.starts_with("rebrand.text")),
        "expected a depth warning, got {warnings:?}"
    );
}
