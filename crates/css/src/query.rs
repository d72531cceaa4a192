//! Scoped element queries.
//!
//! `query_selector*` and `closest` stay inside one tree, exactly like their
//! DOM namesakes: they never descend into a shadow root and never climb out
//! of one. `deep_query_all` is the explicit exception and enters every
//! encapsulated subtree it meets.

use crate::syntax::{AttrOp, Compound, Selector, SelectorList, parse_selector_list};
use dom::{NodeKey, TreeWalk};

// Check if an element matches a simple selector
fn matches_simple<T: TreeWalk>(tree: &T, key: NodeKey, selector: &Selector) -> bool {
    match selector {
        Selector::Universal => true,
        Selector::Type(t) => tree.tag_name(key).is_some_and(|name| name.eq_ignore_ascii_case(t)),
        Selector::Id(want) => tree.attr(key, "id") == Some(want.as_str()),
        Selector::Class(want) => tree.has_class(key, want),
        Selector::Attribute { name, op } => {
            let Some(value) = tree.attr(key, name) else {
                return false;
            };
            match op {
                AttrOp::Exists => true,
                AttrOp::Equals(v) => value == v,
                AttrOp::Includes(v) => value.split_ascii_whitespace().any(|t| t == v),
                AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
                AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
                AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
            }
        }
    }
}

fn matches_compound<T: TreeWalk>(tree: &T, key: NodeKey, compound: &Compound) -> bool {
    tree.is_element(key) && compound.0.iter().all(|s| matches_simple(tree, key, s))
}

pub fn matches<T: TreeWalk>(tree: &T, key: NodeKey, selectors: &SelectorList) -> bool {
    selectors.0.iter().any(|c| matches_compound(tree, key, c))
}

/// First matching element below `scope` in document order.
pub fn query_selector<T: TreeWalk>(tree: &T, scope: NodeKey, selectors: &str) -> Option<NodeKey> {
    let list = parse_selector_list(selectors);
    if list.is_empty() {
        return None;
    }
    tree.descendants(scope).find(|key| matches(tree, *key, &list))
}

pub fn query_selector_all<T: TreeWalk>(tree: &T, scope: NodeKey, selectors: &str) -> Vec<NodeKey> {
    let list = parse_selector_list(selectors);
    if list.is_empty() {
        return Vec::new();
    }
    tree.descendants(scope)
        .filter(|key| matches(tree, *key, &list))
        .collect()
}

/// Nearest inclusive ancestor matching `selectors`, stopping at the root of
/// the tree `key` lives in.
pub fn closest<T: TreeWalk>(tree: &T, key: NodeKey, selectors: &str) -> Option<NodeKey> {
    let list = parse_selector_list(selectors);
    let mut current = Some(key);
    while let Some(node) = current {
        if matches(tree, node, &list) {
            return Some(node);
        }
        current = tree.parent(node);
    }
    None
}

pub fn get_element_by_id<T: TreeWalk>(tree: &T, id: &str) -> Option<NodeKey> {
    tree.descendants(tree.document())
        .find(|key| tree.is_element(*key) && tree.attr(*key, "id") == Some(id))
}

/// Matching elements below `scope` and inside every shadow root reachable
/// from it, outer trees first.
pub fn deep_query_all<T: TreeWalk>(tree: &T, scope: NodeKey, selectors: &str) -> Vec<NodeKey> {
    let list = parse_selector_list(selectors);
    let mut out = Vec::new();
    if list.is_empty() {
        return out;
    }
    let mut roots = vec![scope];
    while let Some(root) = roots.pop() {
        for key in tree.descendants(root) {
            if matches(tree, key, &list) {
                out.push(key);
            }
            if let Some(shadow) = tree.shadow_root(key) {
                roots.push(shadow);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{HostDom, HostTree};

    fn sample() -> (HostDom, NodeKey, NodeKey, NodeKey) {
        let mut dom = HostDom::new();
        let body = dom.body().unwrap();
        let footer = dom.create_element("div");
        dom.set_attr(footer, "class", "page-footer").unwrap();
        dom.append_child(body, footer).unwrap();
        let link = dom.create_element("a");
        dom.set_attr(link, "href", "https://www.openhomefoundation.org/").unwrap();
        dom.append_child(footer, link).unwrap();
        let host = dom.create_element("ha-card");
        dom.append_child(body, host).unwrap();
        let root = dom.attach_shadow(host).unwrap();
        let hidden = dom.create_element("a");
        dom.set_attr(hidden, "href", "https://www.openhomefoundation.org/").unwrap();
        dom.append_child(root, hidden).unwrap();
        (dom, footer, link, hidden)
    }

    #[test]
    fn query_does_not_enter_shadow_roots() {
        let (dom, _, link, _) = sample();
        let found = query_selector_all(&dom, dom.document(), r#"a[href*="openhomefoundation"]"#);
        assert_eq!(found, vec![link]);
    }

    #[test]
    fn deep_query_enters_shadow_roots() {
        let (dom, _, link, hidden) = sample();
        let found = deep_query_all(&dom, dom.document(), "a");
        assert_eq!(found, vec![link, hidden]);
    }

    #[test]
    fn closest_matches_substring_class() {
        let (dom, footer, link, hidden) = sample();
        assert_eq!(closest(&dom, link, r#"div[class*="footer"]"#), Some(footer));
        assert_eq!(closest(&dom, link, "a"), Some(link));
        // Stops at the shadow root instead of reaching the light-tree footer.
        assert_eq!(closest(&dom, hidden, "div"), None);
    }

    #[test]
    fn empty_contains_never_matches() {
        let (dom, _, _, _) = sample();
        assert!(query_selector(&dom, dom.document(), r#"a[href*=""]"#).is_none());
    }
}
