use super::{PatchContext, hide, insert_before_node, logo_image, markers, refresh_logo};
use css::{closest, query_selector, query_selector_all, set_inline_property};
use dom::{DomError, HostTree, NodeKey};

/// Light-tree elements that are probably the product logo.
const GENERIC_LOGO_SELECTORS: &str = r#"ha-icon-button[slot="navigationIcon"], .ha-logo, img[alt="Home Assistant"], img[src*="home-assistant"]"#;

const LOGIN_LOGO_STYLE: &str = "height: 80px; width: auto; max-width: 200px; object-fit: contain;";
const LOGIN_FALLBACK_STYLE: &str =
    "height: 80px; width: auto; max-width: 200px; object-fit: contain; display: block; margin: 0 auto 16px;";
const LOADING_LOGO_STYLE: &str = "height: 120px; width: auto; max-width: 240px; object-fit: contain;";

/// Only `img` matches are rewritten; icon buttons have nothing to swap.
pub(crate) fn generic<T: HostTree>(tree: &mut T, ctx: &PatchContext<'_>) -> Result<usize, DomError> {
    let Some(logo) = ctx.config.logo() else {
        return Ok(0);
    };
    let mut changed = 0;
    for key in query_selector_all(tree, tree.document(), GENERIC_LOGO_SELECTORS) {
        if tree.tag_name(key) != Some("img") {
            continue;
        }
        let src = tree.set_attr_if_changed(key, "src", logo)?;
        let alt = tree.set_attr_if_changed(key, "alt", ctx.config.logo_alt())?;
        if src || alt {
            changed += 1;
        }
    }
    Ok(changed)
}

/// Replace the sign-in logo inside the login component's shadow tree.
///
/// The product icon is a small square vector icon, usually in a `.logo`
/// container; failing that, the first image or icon of the card content is
/// taken. At most one image is ever injected per tree. Returns whether
/// anything was written.
pub(crate) fn login<T: HostTree>(
    tree: &mut T,
    root: NodeKey,
    ctx: &PatchContext<'_>,
) -> Result<bool, DomError> {
    if !ctx.config.has_logo() {
        return Ok(false);
    }
    if let Some(existing) = query_selector(tree, root, &markers::class_selector(markers::LOGIN_LOGO)) {
        return refresh_logo(tree, existing, ctx);
    }

    let icon = query_selector_all(tree, root, "ha-svg-icon, svg")
        .into_iter()
        .filter(|key| !tree.has_class(*key, markers::HIDDEN))
        .find(|key| looks_like_product_icon(&*tree, *key));
    if let Some(icon) = icon {
        return swap(tree, icon, ctx, markers::LOGIN_LOGO, LOGIN_LOGO_STYLE);
    }

    let Some(container) = query_selector(tree, root, ".card-content, .content, .authorize") else {
        return Ok(false);
    };
    let Some(existing) = query_selector(tree, container, "img, ha-svg-icon, svg") else {
        return Ok(false);
    };
    let Some(img) = logo_image(tree, ctx, markers::LOGIN_LOGO, LOGIN_FALLBACK_STYLE)? else {
        return Ok(false);
    };
    set_inline_property(tree, existing, "display", "none")?;
    insert_before_node(tree, img, existing)?;
    Ok(true)
}

fn looks_like_product_icon<T: HostTree>(tree: &T, key: NodeKey) -> bool {
    closest(tree, key, ".logo").is_some()
        || tree.attr(key, "viewbox").is_some_and(|v| v.contains("24"))
        || tree.parent(key).is_some_and(|p| tree.has_class(p, "logo"))
}

/// Replace the loading screen's product icon, once; later passes only keep
/// the injected image current.
pub(crate) fn loading<T: HostTree>(
    tree: &mut T,
    root: NodeKey,
    ctx: &PatchContext<'_>,
) -> Result<bool, DomError> {
    if !ctx.config.has_logo() {
        return Ok(false);
    }
    if let Some(existing) = query_selector(tree, root, &markers::class_selector(markers::LOADING_LOGO)) {
        return refresh_logo(tree, existing, ctx);
    }
    match query_selector(tree, root, "ha-svg-icon") {
        Some(icon) if !tree.has_class(icon, markers::HIDDEN) => {
            swap(tree, icon, ctx, markers::LOADING_LOGO, LOADING_LOGO_STYLE)
        }
        _ => Ok(false),
    }
}

fn swap<T: HostTree>(
    tree: &mut T,
    icon: NodeKey,
    ctx: &PatchContext<'_>,
    class: &str,
    style: &str,
) -> Result<bool, DomError> {
    let Some(img) = logo_image(tree, ctx, class, style)? else {
        return Ok(false);
    };
    hide(tree, icon)?;
    insert_before_node(tree, img, icon)?;
    log::debug!(target: "rebrand.patch", "injected .{class}");
    Ok(true)
}
