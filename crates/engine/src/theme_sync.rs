//! Keeps injected logos on the variant matching the current theme.

use crate::observer::{ObserveOptions, ObserverRegistry};
use crate::patch::markers;
use core_types::{BrandingConfig, ObserverKind};
use css::{deep_query_all, detect_color_scheme, query_selector, ColorScheme};
use dom::{DomError, HostTree};

/// Set every injected logo's `src` to the variant for the current scheme.
/// Searches inside shadow trees, where the logos actually live.
pub(crate) fn sync_logos<T: HostTree>(tree: &mut T, config: &BrandingConfig) -> Result<usize, DomError> {
    if config.logo_dark().is_none() {
        return Ok(0);
    }
    let (scheme, source) = detect_color_scheme(tree);
    let Some(src) = config.logo_for(scheme == ColorScheme::Dark) else {
        return Ok(0);
    };
    let mut changed = 0;
    for logo in deep_query_all(tree, tree.document(), &markers::injected_logo_selector()) {
        if tree.tag_name(logo) == Some("img") && tree.set_attr_if_changed(logo, "src", src)? {
            changed += 1;
        }
    }
    if changed > 0 {
        log::debug!(target: "rebrand.theme", "{scheme:?} via {source:?}: swapped {changed} logos");
    }
    Ok(changed)
}

/// Watch what the theme engine touches: the color-scheme meta element, the
/// body class, and the root element's class and inline style.
pub(crate) fn observe_theme<T: HostTree>(tree: &mut T, observers: &mut ObserverRegistry) {
    let document = tree.document();
    if let Some(meta) = query_selector(tree, document, r#"meta[name="color-scheme"]"#) {
        observers.observe(tree, ObserverKind::Theme, meta, ObserveOptions::attributes(&["content"]));
    }
    if let Some(body) = tree.body() {
        observers.observe(tree, ObserverKind::Theme, body, ObserveOptions::attributes(&["class"]));
    }
    if let Some(html) = tree.document_element() {
        observers.observe(
            tree,
            ObserverKind::Theme,
            html,
            ObserveOptions::attributes(&["class", "style"]),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PatchContext, sidebar};
    use dom::fixtures::{home_assistant_shell, login_page};
    use dom::TreeWalk;

    fn config() -> BrandingConfig {
        BrandingConfig {
            logo: Some("/local/l.png".into()),
            logo_dark: Some("/local/ld.png".into()),
            ..BrandingConfig::default()
        }
    }

    #[test]
    fn swaps_logos_inside_shadow_trees() {
        let (mut dom, shell) = home_assistant_shell();
        let parts = shell.main.unwrap();
        let config = config();
        sidebar::apply(&mut dom, parts.sidebar_shadow, &PatchContext { config: &config, dark: false })
            .unwrap();

        let body = dom.body().unwrap();
        dom.add_class(body, "dark").unwrap();
        assert_eq!(sync_logos(&mut dom, &config).unwrap(), 1);
        let logo = query_selector(&dom, parts.sidebar_shadow, ".ha-rebrand-logo").unwrap();
        assert_eq!(dom.attr(logo, "src"), Some("/local/ld.png"));

        dom.set_attr(body, "class", "").unwrap();
        assert_eq!(sync_logos(&mut dom, &config).unwrap(), 1);
        assert_eq!(dom.attr(logo, "src"), Some("/local/l.png"));
    }

    #[test]
    fn no_dark_variant_means_no_sync() {
        let (mut dom, parts) = login_page();
        let config = BrandingConfig {
            logo: Some("/local/l.png".into()),
            ..BrandingConfig::default()
        };
        crate::patch::logos::login(&mut dom, parts.shadow, &PatchContext { config: &config, dark: false })
            .unwrap();
        dom.set_prefers_dark(true);
        assert_eq!(sync_logos(&mut dom, &config).unwrap(), 0);
    }
}
