use super::markers::COLOR_STYLE_ID;
use core_types::BrandingConfig;
use css::get_element_by_id;
use dom::{DomError, HostTree};

/// Keep one `<style id="ha-rebrand-colors">` in `head` overriding the primary
/// color custom properties at both `:root` and `html` scope.
pub(crate) fn apply<T: HostTree>(tree: &mut T, config: &BrandingConfig) -> Result<bool, DomError> {
    let Some(color) = config.primary_color.as_deref() else {
        return Ok(false);
    };
    let css = stylesheet(color.trim());
    let style = match get_element_by_id(tree, COLOR_STYLE_ID) {
        Some(style) => style,
        None => {
            let head = tree.head().ok_or(DomError::MissingNode(tree.document()))?;
            let style = tree.create_element("style");
            tree.set_attr(style, "id", COLOR_STYLE_ID)?;
            tree.append_child(head, style)?;
            style
        }
    };
    if tree.text_content(style) == css {
        return Ok(false);
    }
    tree.set_text_content(style, &css)?;
    log::debug!(target: "rebrand.patch", "primary color {color}");
    Ok(true)
}

fn stylesheet(color: &str) -> String {
    let block = format!(
        "  --primary-color: {color} !important;\n  --light-primary-color: {color}40 !important;\n  --dark-primary-color: {color} !important;\n"
    );
    format!(":root {{\n{block}}}\nhtml {{\n{block}}}\n")
}
