use crate::tree::{HostTree, TreeWalk};
use crate::types::{DomError, NodeKey};

#[derive(Debug, Clone)]
pub struct LinkTag {
    pub key: NodeKey,
    pub rel: Vec<String>, // e.g. ["icon"], ["apple-touch-icon"]
    pub href: Option<String>,
}

impl LinkTag {
    pub fn has_rel(&self, token: &str) -> bool {
        self.rel.iter().any(|r| r == token)
    }

    /// Matches `link[rel*="icon"]`: any rel token mentioning an icon.
    pub fn is_icon(&self) -> bool {
        self.rel.iter().any(|r| r.contains("icon"))
    }
}

/// First `<title>` in the document, the one `document.title` reflects.
pub fn find_title_element<T: TreeWalk>(tree: &T) -> Option<NodeKey> {
    tree.descendants(tree.document())
        .find(|key| tree.tag_name(*key) == Some("title"))
}

/// The title as a browser reports it: trimmed, inner whitespace collapsed.
pub fn document_title<T: TreeWalk>(tree: &T) -> String {
    let Some(title) = find_title_element(tree) else {
        return String::new();
    };
    tree.text_content(title)
        .split_ascii_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn set_document_title<T: HostTree>(tree: &mut T, title: &str) -> Result<NodeKey, DomError> {
    let element = match find_title_element(tree) {
        Some(element) => element,
        None => {
            let head = tree.head().ok_or(DomError::MissingNode(NodeKey::INVALID))?;
            let element = tree.create_element("title");
            tree.append_child(head, element)?;
            element
        }
    };
    tree.set_text_content(element, title)?;
    Ok(element)
}

/// All `<link>` elements in the document's light tree.
pub fn collect_links<T: TreeWalk>(tree: &T) -> Vec<LinkTag> {
    tree.descendants(tree.document())
        .filter(|key| tree.tag_name(*key) == Some("link"))
        .map(|key| LinkTag {
            key,
            rel: tree
                .attr(key, "rel")
                .unwrap_or("")
                .split_ascii_whitespace()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
            href: tree.attr(key, "href").map(|s| s.to_string()),
        })
        .collect()
}
