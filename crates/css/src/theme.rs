//! Light/dark detection for the host UI.
//!
//! Signals are consulted in a fixed order and the first decisive one wins:
//! the `color-scheme` meta element, the luminance of the resolved primary
//! background, the legacy `dark` class on `body`/`html`, and finally the
//! environment's color-scheme preference. Nothing is cached between calls.

use crate::query::query_selector;
use crate::values::{parse_color, relative_luminance};
use dom::TreeWalk;

pub const BACKGROUND_PROPERTY: &str = "--primary-background-color";
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.2;
pub const LEGACY_DARK_CLASS: &str = "dark";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Which signal decided the scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeSource {
    MetaTag,
    BackgroundLuminance,
    LegacyClass,
    SystemPreference,
    Default,
}

pub fn is_dark_mode<T: TreeWalk>(tree: &T) -> bool {
    detect_color_scheme(tree).0 == ColorScheme::Dark
}

pub fn detect_color_scheme<T: TreeWalk>(tree: &T) -> (ColorScheme, SchemeSource) {
    if let Some(scheme) = meta_scheme(tree) {
        return (scheme, SchemeSource::MetaTag);
    }

    if let Some(rgb) = tree.computed_root_property(BACKGROUND_PROPERTY).and_then(parse_color)
        && relative_luminance(rgb) < DARK_LUMINANCE_THRESHOLD
    {
        return (ColorScheme::Dark, SchemeSource::BackgroundLuminance);
    }

    let legacy = [tree.body(), tree.document_element()]
        .into_iter()
        .flatten()
        .any(|key| tree.has_class(key, LEGACY_DARK_CLASS));
    if legacy {
        return (ColorScheme::Dark, SchemeSource::LegacyClass);
    }

    if tree.prefers_dark_color_scheme() {
        return (ColorScheme::Dark, SchemeSource::SystemPreference);
    }

    (ColorScheme::Light, SchemeSource::Default)
}

// Only an exact single keyword counts; "light dark" leaves the choice open.
fn meta_scheme<T: TreeWalk>(tree: &T) -> Option<ColorScheme> {
    let meta = query_selector(tree, tree.document(), r#"meta[name="color-scheme"]"#)?;
    let content = tree.attr(meta, "content")?.trim();
    if content.eq_ignore_ascii_case("dark") {
        Some(ColorScheme::Dark)
    } else if content.eq_ignore_ascii_case("light") {
        Some(ColorScheme::Light)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{HostDom, HostTree, NodeKey};

    fn with_meta(content: &str) -> (HostDom, NodeKey) {
        let mut dom = HostDom::new();
        let head = dom.head().unwrap();
        let meta = dom.create_element("meta");
        dom.set_attr(meta, "name", "color-scheme").unwrap();
        dom.set_attr(meta, "content", content).unwrap();
        dom.append_child(head, meta).unwrap();
        (dom, meta)
    }

    #[test]
    fn defaults_to_light() {
        let dom = HostDom::new();
        assert_eq!(
            detect_color_scheme(&dom),
            (ColorScheme::Light, SchemeSource::Default)
        );
    }

    #[test]
    fn explicit_light_beats_dark_background() {
        let (mut dom, _) = with_meta("light");
        dom.set_root_property(BACKGROUND_PROPERTY, "#111111");
        dom.set_prefers_dark(true);
        assert!(!is_dark_mode(&dom));
    }

    #[test]
    fn explicit_dark_beats_light_background() {
        let (mut dom, _) = with_meta("dark");
        dom.set_root_property(BACKGROUND_PROPERTY, "#fafafa");
        assert_eq!(
            detect_color_scheme(&dom),
            (ColorScheme::Dark, SchemeSource::MetaTag)
        );
    }

    #[test]
    fn ambiguous_meta_falls_through_to_luminance() {
        let (mut dom, _) = with_meta("light dark");
        dom.set_root_property(BACKGROUND_PROPERTY, "rgb(17, 17, 17)");
        assert_eq!(
            detect_color_scheme(&dom),
            (ColorScheme::Dark, SchemeSource::BackgroundLuminance)
        );
    }

    #[test]
    fn light_background_is_not_decisive() {
        let mut dom = HostDom::new();
        dom.set_root_property(BACKGROUND_PROPERTY, "#fafafa");
        let body = dom.body().unwrap();
        dom.add_class(body, "dark").unwrap();
        assert_eq!(
            detect_color_scheme(&dom),
            (ColorScheme::Dark, SchemeSource::LegacyClass)
        );
    }

    #[test]
    fn system_preference_is_last() {
        let mut dom = HostDom::new();
        dom.set_prefers_dark(true);
        assert_eq!(
            detect_color_scheme(&dom),
            (ColorScheme::Dark, SchemeSource::SystemPreference)
        );
    }
}
