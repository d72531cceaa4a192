mod common;

use common::{ScriptedStore, SequenceStore, config, started};
use core_types::BrandingConfig;
use css::{deep_query_all, get_inline_property, query_selector, query_selector_all};
use dom::fixtures::{element, home_assistant_shell, loading_page, login_page};
use dom::head::{document_title, set_document_title};
use dom::{HostDom, HostTree, TreeWalk};
use engine::{Engine, Session, markers};
use serde_json::json;

fn full_config() -> BrandingConfig {
    config(json!({
        "brand_name": "Acme",
        "logo": "/local/acme.png",
        "logo_dark": "/local/acme-dark.png",
        "favicon": "/local/acme.ico",
        "sidebar_title": "Acme",
        "document_title": "Acme Home",
        "primary_color": "#ff6600",
        "replacements": { "Home Assistant": "Acme Home" }
    }))
}

fn sidebar_logo(dom: &HostDom, sidebar_shadow: dom::NodeKey) -> Option<dom::NodeKey> {
    query_selector(dom, sidebar_shadow, &format!("img.{}", markers::SIDEBAR_LOGO))
}

#[test]
fn second_pass_changes_nothing() {
    let (mut dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let (store, _) = ScriptedStore::new(0, full_config());
    let mut engine = Engine::new(store);
    engine.start(&mut dom);
    let _ = dom.take_records();
    let live = dom.live_count();

    for _ in 0..2 {
        assert!(engine.refresh(&mut dom).sidebar_applied());
        assert_eq!(dom.pending_records(), 0, "a repeated pass must not write");
        assert_eq!(dom.live_count(), live);
    }

    for class in markers::INJECTED_LOGOS {
        let found = deep_query_all(&dom, dom.document(), &format!(".{class}"));
        assert!(found.len() <= 1, "{class} injected {} times", found.len());
    }
    assert!(sidebar_logo(&dom, parts.sidebar_shadow).is_some());
    let styles = query_selector_all(&dom, dom.document(), &format!("style#{}", markers::COLOR_STYLE_ID));
    assert_eq!(styles.len(), 1);
}

#[test]
fn full_branding_on_rendered_dashboard() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let session = started(dom, full_config());
    let dom = session.dom();

    assert_eq!(document_title(dom), "Acme Home");
    assert_eq!(dom.text_content(parts.sidebar_title), "Acme");
    assert_eq!(dom.text_content(parts.toolbar_title), "Acme Home");

    let logo = sidebar_logo(dom, parts.sidebar_shadow).expect("sidebar logo");
    assert_eq!(dom.attr(logo, "src"), Some("/local/acme.png"));
    assert_eq!(dom.attr(logo, "alt"), Some("Acme"));
    assert_eq!(dom.parent(logo), Some(parts.menu));
    assert_eq!(
        get_inline_property(dom, parts.original_logo, "display").as_deref(),
        Some("none")
    );
    assert!(dom.is_connected(parts.original_logo));

    let icons = query_selector_all(dom, dom.document(), r#"link[rel="icon"]"#);
    assert!(icons.iter().all(|k| dom.attr(*k, "href") == Some("/local/acme.ico")));
    let touch = query_selector(dom, dom.document(), r#"link[rel="apple-touch-icon"]"#).unwrap();
    assert_eq!(dom.attr(touch, "href"), Some("/local/acme.png"));
}

#[test]
fn dark_theme_selects_dark_logo() {
    let (mut dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let head = dom.head().unwrap();
    element(&mut dom, head, "meta", &[("name", "color-scheme"), ("content", "dark")]);
    let _ = dom.take_records();

    let session = started(
        dom,
        config(json!({ "logo": "/l.png", "logo_dark": "/ld.png", "sidebar_title": "Acme" })),
    );
    let dom = session.dom();
    assert_eq!(dom.text_content(parts.sidebar_title), "Acme");
    let logo = sidebar_logo(dom, parts.sidebar_shadow).unwrap();
    assert_eq!(dom.attr(logo, "src"), Some("/ld.png"));
}

#[test]
fn explicit_light_meta_beats_dark_background() {
    let (mut dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let head = dom.head().unwrap();
    element(&mut dom, head, "meta", &[("name", "color-scheme"), ("content", "light")]);
    dom.set_root_property("--primary-background-color", "#111111");
    let _ = dom.take_records();

    let session = started(dom, config(json!({ "logo": "/l.png", "logo_dark": "/ld.png" })));
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/l.png"));
}

#[test]
fn theme_change_swaps_injected_logo() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let mut session = started(dom, config(json!({ "logo": "/l.png", "logo_dark": "/ld.png" })));
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/l.png"));

    let body = session.dom().body().unwrap();
    session.dom_mut().add_class(body, "dark").unwrap();
    session.run_until_idle().unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/ld.png"));
}

#[test]
fn theme_engine_background_swaps_logo() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let mut session = started(dom, config(json!({ "logo": "/l.png", "logo_dark": "/ld.png" })));
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();

    session
        .dom_mut()
        .set_root_property("--primary-background-color", "#1c1c1c");
    session.run_until_idle().unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/ld.png"));

    session
        .dom_mut()
        .set_root_property("--primary-background-color", "#fafafa");
    session.run_until_idle().unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/l.png"));
}

#[test]
fn system_preference_change_swaps_logo() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let mut session = started(dom, config(json!({ "logo": "/l.png", "logo_dark": "/ld.png" })));
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();

    session.set_prefers_dark(true).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/ld.png"));
    session.set_prefers_dark(false).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/l.png"));
}

#[test]
fn reload_adding_dark_logo_follows_theme() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let store = SequenceStore::new(vec![
        config(json!({ "logo": "/l.png" })),
        config(json!({ "logo": "/l.png", "logo_dark": "/ld.png" })),
    ]);
    let mut session = Session::new(dom, Engine::new(store));
    session.start().unwrap();
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();

    assert!(session.reload_config().unwrap().sidebar_applied());
    assert_eq!(session.dom().attr(logo, "src"), Some("/l.png"));

    session.set_prefers_dark(true).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/ld.png"));
    assert_eq!(sidebar_logo(session.dom(), parts.sidebar_shadow), Some(logo));
}

#[test]
fn reload_updates_injected_logos() {
    let (dom, shell) = home_assistant_shell();
    let parts = shell.main.unwrap();
    let store = SequenceStore::new(vec![
        config(json!({ "logo": "/old.png" })),
        config(json!({ "logo": "/new.png", "brand_name": "Acme" })),
    ]);
    let mut session = Session::new(dom, Engine::new(store));
    session.start().unwrap();
    let logo = sidebar_logo(session.dom(), parts.sidebar_shadow).unwrap();
    assert_eq!(session.dom().attr(logo, "src"), Some("/old.png"));

    session.reload_config().unwrap();
    assert_eq!(sidebar_logo(session.dom(), parts.sidebar_shadow), Some(logo));
    assert_eq!(session.dom().attr(logo, "src"), Some("/new.png"));
    assert_eq!(session.dom().attr(logo, "alt"), Some("Acme"));
}

#[test]
fn self_containing_replacement_is_stable_across_passes() {
    let (mut dom, _) = home_assistant_shell();
    let body = dom.body().unwrap();
    let note = element(&mut dom, body, "p", &[]);
    dom::fixtures::text(&mut dom, note, "Welcome to Home Assistant");
    let _ = dom.take_records();

    let mut session = started(
        dom,
        config(json!({ "replacements": { "Home Assistant": "My Home Assistant" } })),
    );
    assert_eq!(session.dom().text_content(note), "Welcome to My Home Assistant");
    for _ in 0..2 {
        session.refresh().unwrap();
    }
    assert_eq!(session.dom().text_content(note), "Welcome to My Home Assistant");
}

#[test]
fn title_rewritten_exactly_once() {
    let (dom, _) = home_assistant_shell();
    let (store, _) = ScriptedStore::new(
        0,
        config(json!({
            "document_title": "Acme Home",
            "replacements": { "Home Assistant": "Acme Home" }
        })),
    );
    let mut session = Session::new(dom, Engine::new(store)).with_step_limit(4);
    session.start().expect("title observer must not feed itself");

    assert_eq!(document_title(session.dom()), "Acme Home");
    assert_eq!(session.run_until_idle().unwrap(), 0);
}

#[test]
fn title_fight_converges() {
    let (dom, _) = home_assistant_shell();
    let (store, _) = ScriptedStore::new(
        0,
        config(json!({
            "document_title": "My Home Assistant",
            "replacements": { "Home Assistant": "My Home Assistant" }
        })),
    );
    let mut session = Session::new(dom, Engine::new(store)).with_step_limit(8);
    session.start().unwrap();
    assert_eq!(document_title(session.dom()), "My Home Assistant");

    for page in ["Home Assistant", "Energy - Home Assistant", "Home Assistant"] {
        set_document_title(session.dom_mut(), page).unwrap();
        let steps = session.run_until_idle().expect("title writes settle");
        assert!(steps <= 3, "{page}: took {steps} rounds");
        assert_eq!(
            document_title(session.dom()),
            page.replace("Home Assistant", "My Home Assistant")
        );
    }
    assert_eq!(session.run_until_idle().unwrap(), 0);
}

#[test]
fn login_page_logo_is_swapped_once() {
    let (dom, parts) = login_page();
    let mut session = started(dom, config(json!({ "logo": "/local/acme.png" })));

    let injected = query_selector_all(session.dom(), parts.shadow, &format!(".{}", markers::LOGIN_LOGO));
    assert_eq!(injected.len(), 1);
    assert!(session.dom().has_class(parts.icon, markers::HIDDEN));
    assert_eq!(session.dom().attr(injected[0], "src"), Some("/local/acme.png"));

    session.refresh().unwrap();
    session.refresh().unwrap();
    let again = query_selector_all(session.dom(), parts.shadow, &format!(".{}", markers::LOGIN_LOGO));
    assert_eq!(again, injected);
}

#[test]
fn loading_page_hides_foundation_footer() {
    let (dom, parts) = loading_page();
    let session = started(dom, config(json!({ "logo": "/local/acme.png" })));
    let dom = session.dom();

    assert!(query_selector(dom, parts.shadow, &format!(".{}", markers::LOADING_LOGO)).is_some());
    assert!(dom.has_class(parts.icon, markers::HIDDEN));
    assert!(dom.has_class(parts.footer_link, markers::HIDDEN));
    assert!(!dom.has_class(parts.status, markers::HIDDEN));
}

#[test]
fn footer_kept_when_disabled() {
    let (dom, parts) = loading_page();
    let session = started(dom, config(json!({ "hide_open_home_foundation": false })));
    let dom = session.dom();

    assert!(!dom.has_class(parts.footer_link, markers::HIDDEN));
    assert!(!dom.has_class(parts.footer, markers::HIDDEN));
}

#[test]
fn replacement_keys_are_literal() {
    let (mut dom, _) = home_assistant_shell();
    let body = dom.body().unwrap();
    let note = element(&mut dom, body, "p", &[]);
    dom::fixtures::text(&mut dom, note, "Version 1.0 (beta) vs 1x0");
    let _ = dom.take_records();

    let session = started(dom, config(json!({ "replacements": { "1.0": "2.0", "(beta)": "[rc]" } })));
    assert_eq!(session.dom().text_content(note), "Version 2.0 [rc] vs 1x0");
}
