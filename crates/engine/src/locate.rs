//! Finding the dashboard's named regions.
//!
//! Every lookup is allowed to fail: a missing region only means the host has
//! not rendered it yet.

use css::query_selector;
use dom::{NodeKey, TreeWalk};

pub const APP_TAG: &str = "home-assistant";
pub const MAIN_TAG: &str = "home-assistant-main";
pub const SIDEBAR_TAG: &str = "ha-sidebar";
pub const LOVELACE_TAG: &str = "ha-panel-lovelace";
pub const LOGIN_TAG: &str = "ha-authorize";
pub const LOADING_TAG: &str = "ha-init-page";

/// Cached handles are reused only while still connected.
#[derive(Debug, Default)]
pub struct Locator {
    sidebar: Option<NodeKey>,
    main: Option<NodeKey>,
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sidebar's shadow root.
    pub fn sidebar_root<T: TreeWalk>(&mut self, tree: &T) -> Option<NodeKey> {
        if let Some(cached) = self.sidebar.filter(|key| tree.is_connected(*key))
            && let Some(root) = tree.shadow_root(cached)
        {
            return Some(root);
        }

        let sidebar = query_selector(tree, tree.document(), SIDEBAR_TAG)
            .or_else(|| self.sidebar_through_main(tree))?;
        self.sidebar = Some(sidebar);
        tree.shadow_root(sidebar)
    }

    // home-assistant → #shadow-root → home-assistant-main → #shadow-root → ha-sidebar
    fn sidebar_through_main<T: TreeWalk>(&mut self, tree: &T) -> Option<NodeKey> {
        let app_root = app_root(tree)?;
        if !self.main.is_some_and(|key| tree.is_connected(key)) {
            self.main = query_selector(tree, app_root, MAIN_TAG);
        }
        let main_root = tree.shadow_root(self.main?)?;
        query_selector(tree, main_root, SIDEBAR_TAG)
    }

    #[cfg(test)]
    pub(crate) fn cached_sidebar(&self) -> Option<NodeKey> {
        self.sidebar
    }
}

pub fn app<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    query_selector(tree, tree.document(), APP_TAG)
}

/// The application element's shadow root.
pub fn app_root<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    tree.shadow_root(app(tree)?)
}

pub fn main_view<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    query_selector(tree, app_root(tree)?, MAIN_TAG)
}

pub fn login_root<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    tree.shadow_root(query_selector(tree, tree.document(), LOGIN_TAG)?)
}

pub fn loading_root<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    tree.shadow_root(query_selector(tree, tree.document(), LOADING_TAG)?)
}

/// Where text substitution starts: the main view or dashboard panel when
/// they sit in the light tree, else `body`.
pub fn text_root<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    let document = tree.document();
    query_selector(tree, document, MAIN_TAG)
        .or_else(|| query_selector(tree, document, LOVELACE_TAG))
        .or_else(|| tree.body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::HostTree;
    use dom::fixtures::{bare_shell, element, home_assistant_shell, mount_main, shadow};

    #[test]
    fn finds_sidebar_through_two_shadow_levels() {
        let (dom, shell) = home_assistant_shell();
        let main = shell.main.unwrap();
        let mut locator = Locator::new();
        assert_eq!(locator.sidebar_root(&dom), Some(main.sidebar_shadow));
        assert_eq!(locator.cached_sidebar(), Some(main.sidebar));
        assert_eq!(main_view(&dom), Some(main.main));
    }

    #[test]
    fn prefers_light_tree_sidebar() {
        let (mut dom, _) = bare_shell();
        let body = dom.body().unwrap();
        let sidebar = element(&mut dom, body, "ha-sidebar", &[]);
        let root = shadow(&mut dom, sidebar);
        assert_eq!(Locator::new().sidebar_root(&dom), Some(root));
    }

    #[test]
    fn stale_cache_is_recomputed() {
        let (mut dom, shell) = home_assistant_shell();
        let first = shell.main.unwrap();
        let mut locator = Locator::new();
        locator.sidebar_root(&dom);

        dom.remove(first.main).unwrap();
        assert_eq!(locator.sidebar_root(&dom), None);

        let second = mount_main(&mut dom, shell.ha_shadow);
        assert_eq!(locator.sidebar_root(&dom), Some(second.sidebar_shadow));
        assert_eq!(locator.cached_sidebar(), Some(second.sidebar));
    }

    #[test]
    fn text_root_falls_back_to_body() {
        let (dom, _) = home_assistant_shell();
        assert_eq!(text_root(&dom), dom.body());
    }
}
