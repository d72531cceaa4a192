use core_types::BrandingConfig;
use dom::head::collect_links;
use dom::{DomError, HostTree};

const APPLE_TOUCH_ICON: &str = "apple-touch-icon";

/// Point every icon link at the configured favicon, creating one when the
/// page has none. With a logo configured the touch icon follows the logo
/// instead, so the two never overwrite each other.
pub(crate) fn apply<T: HostTree>(tree: &mut T, config: &BrandingConfig) -> Result<bool, DomError> {
    let Some(favicon) = config.favicon.as_deref() else {
        return Ok(false);
    };
    let mut changed = false;
    let links = collect_links(tree);
    let icons: Vec<_> = links
        .iter()
        .filter(|link| link.is_icon())
        .filter(|link| !(config.has_logo() && link.has_rel(APPLE_TOUCH_ICON)))
        .collect();

    for link in &icons {
        changed |= tree.set_attr_if_changed(link.key, "href", favicon)?;
    }
    if icons.is_empty() {
        append_link(tree, "icon", favicon)?;
        changed = true;
    }

    if let Some(logo) = config.logo() {
        let touch = links.iter().find(|link| link.rel == [APPLE_TOUCH_ICON]);
        match touch {
            Some(link) => changed |= tree.set_attr_if_changed(link.key, "href", logo)?,
            None => {
                append_link(tree, APPLE_TOUCH_ICON, logo)?;
                changed = true;
            }
        }
    }
    Ok(changed)
}

fn append_link<T: HostTree>(tree: &mut T, rel: &str, href: &str) -> Result<(), DomError> {
    let head = tree.head().ok_or(DomError::MissingNode(tree.document()))?;
    let link = tree.create_element("link");
    tree.set_attr(link, "rel", rel)?;
    tree.set_attr(link, "href", href)?;
    tree.append_child(head, link)
}
