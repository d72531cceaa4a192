//! One operation per dashboard region. Each is idempotent on its own and
//! skips silently when its setting or its region is missing.

pub mod markers;

pub(crate) mod color;
pub(crate) mod favicon;
pub(crate) mod footer;
pub(crate) mod logos;
pub(crate) mod sidebar;
pub(crate) mod title;

use core_types::BrandingConfig;
use css::set_inline_property;
use dom::{DomError, HostTree, NodeKey};

/// Settings and theme as seen at the start of a pass.
#[derive(Clone, Copy)]
pub(crate) struct PatchContext<'a> {
    pub config: &'a BrandingConfig,
    pub dark: bool,
}

impl PatchContext<'_> {
    pub fn logo_src(&self) -> Option<&str> {
        self.config.logo_for(self.dark)
    }
}

/// Hide without removing: marker class plus `display: none`.
pub(crate) fn hide<T: HostTree>(tree: &mut T, key: NodeKey) -> Result<bool, DomError> {
    let marked = tree.add_class(key, markers::HIDDEN)?;
    let styled = set_inline_property(tree, key, "display", "none")?;
    Ok(marked || styled)
}

/// A detached `img` carrying `class`, ready to insert.
pub(crate) fn logo_image<T: HostTree>(
    tree: &mut T,
    ctx: &PatchContext<'_>,
    class: &str,
    style: &str,
) -> Result<Option<NodeKey>, DomError> {
    let Some(src) = ctx.logo_src() else {
        return Ok(None);
    };
    let img = tree.create_element("img");
    tree.set_attr(img, "class", class)?;
    tree.set_attr(img, "src", src)?;
    tree.set_attr(img, "alt", ctx.config.logo_alt())?;
    tree.set_attr(img, "style", style)?;
    Ok(Some(img))
}

/// Bring an already injected logo in line with the current settings.
pub(crate) fn refresh_logo<T: HostTree>(
    tree: &mut T,
    img: NodeKey,
    ctx: &PatchContext<'_>,
) -> Result<bool, DomError> {
    let Some(src) = ctx.logo_src() else {
        return Ok(false);
    };
    let src = tree.set_attr_if_changed(img, "src", src)?;
    let alt = tree.set_attr_if_changed(img, "alt", ctx.config.logo_alt())?;
    Ok(src || alt)
}

/// Insert `node` right before `reference` in its parent.
pub(crate) fn insert_before_node<T: HostTree>(
    tree: &mut T,
    node: NodeKey,
    reference: NodeKey,
) -> Result<(), DomError> {
    let parent = tree.parent(reference).ok_or(DomError::InvalidParent(reference))?;
    tree.insert_before(parent, node, Some(reference))
}
