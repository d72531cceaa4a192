use crate::syntax::{Declaration, parse_declarations};
use dom::{DomError, HostTree, NodeKey, TreeWalk};

// If the element has an inline style attribute, return the value of `property`
pub fn get_inline_property<T: TreeWalk>(tree: &T, key: NodeKey, property: &str) -> Option<String> {
    let inline = tree.attr(key, "style")?;
    parse_declarations(inline)
        .into_iter()
        .rev()
        .find(|d| d.name.eq_ignore_ascii_case(property))
        .map(|d| d.value)
}

/// Set one property in the element's inline style, keeping the others.
/// Returns `false` without writing when the value is already in place.
pub fn set_inline_property<T: HostTree>(
    tree: &mut T,
    key: NodeKey,
    property: &str,
    value: &str,
) -> Result<bool, DomError> {
    let property = property.to_ascii_lowercase();
    let mut declarations = tree
        .attr(key, "style")
        .map(parse_declarations)
        .unwrap_or_default();
    match declarations.iter_mut().rev().find(|d| d.name == property) {
        Some(existing) if existing.value == value => return Ok(false),
        Some(existing) => existing.value = value.to_string(),
        None => declarations.push(Declaration {
            name: property,
            value: value.to_string(),
        }),
    }
    tree.set_attr(key, "style", &serialize(&declarations))?;
    Ok(true)
}

fn serialize(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|d| format!("{}: {};", d.name, d.value))
        .collect::<Vec<_>>()
        .join(" ")
}
