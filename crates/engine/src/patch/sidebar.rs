use super::{PatchContext, insert_before_node, logo_image, markers, refresh_logo};
use css::{query_selector, set_inline_property};
use dom::{DomError, HostTree, NodeKey};

const LOGO_STYLE: &str =
    "height: 40px; width: auto; max-width: 180px; object-fit: contain; margin: 12px 12px 4px 12px; display: block;";

/// Patch the sidebar's shadow tree: title text, then the logo. Returns
/// whether anything was written.
pub(crate) fn apply<T: HostTree>(
    tree: &mut T,
    root: NodeKey,
    ctx: &PatchContext<'_>,
) -> Result<bool, DomError> {
    let mut changed = false;

    if let Some(wanted) = ctx.config.sidebar_title.as_deref()
        && let Some(title) = query_selector(tree, root, ".title")
        && tree.text_content(title) != wanted
    {
        tree.set_text_content(title, wanted)?;
        changed = true;
    }

    if !ctx.config.has_logo() {
        return Ok(changed);
    }
    let Some(menu) = query_selector(tree, root, ".menu") else {
        return Ok(changed);
    };
    if let Some(existing) = query_selector(tree, menu, &markers::class_selector(markers::SIDEBAR_LOGO)) {
        return Ok(refresh_logo(tree, existing, ctx)? || changed);
    }

    if let Some(container) = query_selector(tree, menu, ".logo")
        && let Some(original) = query_selector(tree, container, "img, ha-icon-button, ha-svg-icon")
    {
        set_inline_property(tree, original, "display", "none")?;
    }

    let Some(img) = logo_image(tree, ctx, markers::SIDEBAR_LOGO, LOGO_STYLE)? else {
        return Ok(changed);
    };
    match query_selector(tree, menu, ".title") {
        Some(title) => insert_before_node(tree, img, title)?,
        None => tree.prepend(menu, img)?,
    }
    Ok(true)
}
