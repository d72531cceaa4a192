//! Synthetic host trees shaped like the dashboard's real component nesting.
//!
//! The shapes follow what the dashboard renders today:
//! `home-assistant` → shadow → `home-assistant-main` → shadow → `ha-drawer`
//! → `ha-sidebar` → shadow → `.menu` with `.title`.

use crate::tree::{HostTree, TreeWalk};
use crate::{HostDom, NodeKey};

pub const HOST_TITLE: &str = "Home Assistant";

pub fn element(dom: &mut HostDom, parent: NodeKey, name: &str, attrs: &[(&str, &str)]) -> NodeKey {
    let key = dom.create_element(name);
    for (attr, value) in attrs {
        let _ = dom.set_attr(key, attr, value);
    }
    let _ = dom.append_child(parent, key);
    key
}

pub fn text(dom: &mut HostDom, parent: NodeKey, data: &str) -> NodeKey {
    let key = dom.create_text(data);
    let _ = dom.append_child(parent, key);
    key
}

pub fn shadow(dom: &mut HostDom, host: NodeKey) -> NodeKey {
    match dom.shadow_root(host) {
        Some(root) => root,
        None => dom.attach_shadow(host).unwrap_or(host),
    }
}

/// Handles into a rendered dashboard shell.
#[derive(Debug, Clone, Copy)]
pub struct Shell {
    pub home_assistant: NodeKey,
    pub ha_shadow: NodeKey,
    pub main: Option<MainParts>,
}

#[derive(Debug, Clone, Copy)]
pub struct MainParts {
    pub main: NodeKey,
    pub main_shadow: NodeKey,
    pub drawer: NodeKey,
    pub sidebar: NodeKey,
    pub sidebar_shadow: NodeKey,
    pub menu: NodeKey,
    pub original_logo: NodeKey,
    pub sidebar_title: NodeKey,
    pub panel: NodeKey,
    pub panel_shadow: NodeKey,
    pub toolbar_title: NodeKey,
}

/// Head contents every dashboard page carries.
pub fn host_head(dom: &mut HostDom) {
    let Some(head) = dom.head() else {
        return;
    };
    let title = element(dom, head, "title", &[]);
    text(dom, title, HOST_TITLE);
    element(
        dom,
        head,
        "link",
        &[("rel", "icon"), ("href", "/static/icons/favicon.ico")],
    );
    element(
        dom,
        head,
        "link",
        &[
            ("rel", "apple-touch-icon"),
            ("href", "/static/icons/favicon-apple-180x180.png"),
        ],
    );
}

/// A fully rendered dashboard.
pub fn home_assistant_shell() -> (HostDom, Shell) {
    let (mut dom, mut shell) = bare_shell();
    shell.main = Some(mount_main(&mut dom, shell.ha_shadow));
    let _ = dom.take_records();
    (dom, shell)
}

/// The application element exists but has not rendered its main view yet.
pub fn bare_shell() -> (HostDom, Shell) {
    let mut dom = HostDom::new();
    host_head(&mut dom);
    let body = dom.body().unwrap_or(NodeKey::INVALID);
    let home_assistant = element(&mut dom, body, "home-assistant", &[]);
    let ha_shadow = shadow(&mut dom, home_assistant);
    let _ = dom.take_records();
    (
        dom,
        Shell {
            home_assistant,
            ha_shadow,
            main: None,
        },
    )
}

/// Render the main view into the application's shadow root.
pub fn mount_main(dom: &mut HostDom, ha_shadow: NodeKey) -> MainParts {
    // Build detached, then attach in one step the way a template commit does.
    let main = dom.create_element("home-assistant-main");
    let main_shadow = shadow(dom, main);
    let drawer = element(dom, main_shadow, "ha-drawer", &[]);
    let sidebar = element(dom, drawer, "ha-sidebar", &[]);
    let sidebar_shadow = shadow(dom, sidebar);
    let menu = element(dom, sidebar_shadow, "div", &[("class", "menu")]);
    let logo = element(dom, menu, "div", &[("class", "logo")]);
    let original_logo = element(
        dom,
        logo,
        "ha-icon-button",
        &[("slot", "navigationIcon"), ("label", "Hide panel")],
    );
    let sidebar_title = element(dom, menu, "div", &[("class", "title")]);
    text(dom, sidebar_title, HOST_TITLE);
    let list = element(dom, sidebar_shadow, "paper-listbox", &[]);
    for label in ["Overview", "Energy", "Map", "Settings"] {
        let item = element(dom, list, "a", &[("class", "item")]);
        text(dom, item, label);
    }
    let resolver = element(dom, drawer, "partial-panel-resolver", &[]);
    let panel = element(dom, resolver, "ha-panel-lovelace", &[]);
    let panel_shadow = shadow(dom, panel);
    let toolbar = element(dom, panel_shadow, "div", &[("class", "toolbar")]);
    let toolbar_title = element(dom, toolbar, "div", &[("class", "main-title")]);
    text(dom, toolbar_title, HOST_TITLE);
    let marker = dom.create_comment("lit-part");
    let _ = dom.append_child(ha_shadow, marker);
    let _ = dom.append_child(ha_shadow, main);
    MainParts {
        main,
        main_shadow,
        drawer,
        sidebar,
        sidebar_shadow,
        menu,
        original_logo,
        sidebar_title,
        panel,
        panel_shadow,
        toolbar_title,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoginParts {
    pub authorize: NodeKey,
    pub shadow: NodeKey,
    pub icon: NodeKey,
}

/// The sign-in page: the product icon sits in a `.logo` container.
pub fn login_page() -> (HostDom, LoginParts) {
    let mut dom = HostDom::new();
    host_head(&mut dom);
    let body = dom.body().unwrap_or(NodeKey::INVALID);
    let authorize = element(&mut dom, body, "ha-authorize", &[]);
    let root = shadow(&mut dom, authorize);
    let card = element(&mut dom, root, "div", &[("class", "card-content")]);
    let logo = element(&mut dom, card, "div", &[("class", "logo")]);
    let icon = element(&mut dom, logo, "ha-svg-icon", &[("viewbox", "0 0 24 24")]);
    let heading = element(&mut dom, card, "h1", &[]);
    text(&mut dom, heading, "Welcome home!");
    let _ = dom.take_records();
    (
        dom,
        LoginParts {
            authorize,
            shadow: root,
            icon,
        },
    )
}

#[derive(Debug, Clone, Copy)]
pub struct LoadingParts {
    pub init_page: NodeKey,
    pub shadow: NodeKey,
    pub icon: NodeKey,
    pub footer_link: NodeKey,
    pub footer: NodeKey,
    pub status: NodeKey,
}

/// The loading screen with the foundation footer.
pub fn loading_page() -> (HostDom, LoadingParts) {
    let mut dom = HostDom::new();
    host_head(&mut dom);
    let body = dom.body().unwrap_or(NodeKey::INVALID);
    let init_page = element(&mut dom, body, "ha-init-page", &[]);
    let root = shadow(&mut dom, init_page);
    let content = element(&mut dom, root, "div", &[("class", "content")]);
    let icon = element(&mut dom, content, "ha-svg-icon", &[("viewbox", "0 0 240 240")]);
    let status = element(&mut dom, content, "p", &[("class", "status")]);
    text(&mut dom, status, "Loading data");
    let footer = element(&mut dom, root, "div", &[("class", "page-footer")]);
    let footer_link = element(
        &mut dom,
        footer,
        "a",
        &[("href", "https://www.openhomefoundation.org/")],
    );
    let label = element(&mut dom, footer_link, "span", &[]);
    text(&mut dom, label, "Open Home Foundation");
    let credit = element(&mut dom, footer, "div", &[("class", "credit")]);
    let strong = element(&mut dom, credit, "b", &[]);
    text(&mut dom, strong, "HOME ASSISTANT");
    text(&mut dom, credit, " is a project of the foundation");
    let _ = dom.take_records();
    (
        dom,
        LoadingParts {
            init_page,
            shadow: root,
            icon,
            footer_link,
            footer,
            status,
        },
    )
}

/// `depth` nested shadow roots under `body`, each holding one text node with
/// `data`. Returns the text nodes, outermost first.
pub fn shadow_chain(depth: usize, data: &str) -> (HostDom, Vec<NodeKey>) {
    let mut dom = HostDom::new();
    let mut parent = dom.body().unwrap_or(NodeKey::INVALID);
    let mut texts = Vec::with_capacity(depth);
    for level in 0..depth {
        let host = element(&mut dom, parent, &format!("x-level-{level}"), &[]);
        let root = shadow(&mut dom, host);
        let span = element(&mut dom, root, "span", &[]);
        texts.push(text(&mut dom, span, data));
        parent = root;
    }
    let _ = dom.take_records();
    (dom, texts)
}
