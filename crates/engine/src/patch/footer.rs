use super::{hide, markers};
use css::{closest, query_selector_all};
use dom::{DomError, HostTree, NodeKey};

const FOOTER_LINKS: &str = r#"a[href*="openhomefoundation"], a[href*="home-assistant"]"#;
const BRAND_PHRASES: [&str; 3] = ["Open Home Foundation", "HOME ASSISTANT", "OPEN HOME FOUNDATION"];
const FOOTER_CONTAINERS: &str = r#"a, div[class*="footer"], div[class*="bottom"], span"#;

/// Hide the foundation branding on the loading screen. Returns how many
/// elements were newly hidden.
///
/// Elements whose text mentions the brand are hidden directly when they are
/// leaves or links; otherwise the nearest link or footer-like container is
/// hidden, so unrelated siblings keep their layout.
pub(crate) fn suppress<T: HostTree>(tree: &mut T, root: NodeKey) -> Result<usize, DomError> {
    let mut hidden = 0;
    for link in query_selector_all(tree, root, FOOTER_LINKS) {
        if !tree.has_class(link, markers::HIDDEN) && hide(tree, link)? {
            hidden += 1;
        }
    }

    let host = tree.shadow_host(root);
    let elements: Vec<NodeKey> = tree.descendants(root).filter(|k| tree.is_element(*k)).collect();
    for el in elements {
        if tree.has_class(el, markers::HIDDEN) || !mentions_brand(&tree.text_content(el)) {
            continue;
        }
        let leaf = tree.element_children(el).is_empty() || tree.tag_name(el) == Some("a");
        let target = if leaf {
            Some(el)
        } else {
            closest(tree, el, FOOTER_CONTAINERS)
                .filter(|c| Some(*c) != host && !tree.has_class(*c, markers::HIDDEN))
        };
        if let Some(target) = target
            && hide(tree, target)?
        {
            hidden += 1;
        }
    }
    if hidden > 0 {
        log::debug!(target: "rebrand.patch", "hid {hidden} footer branding elements");
    }
    Ok(hidden)
}

fn mentions_brand(text: &str) -> bool {
    BRAND_PHRASES.iter().any(|phrase| text.contains(phrase))
}
