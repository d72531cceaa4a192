use crate::tree::TreeWalk;
use crate::types::{NodeKey, NodeType};

const PREVIEW_CHARS: usize = 40;

/// Indented, depth-first outline of the tree, entering every shadow root.
/// At most `cap` lines are produced.
pub fn outline<T: TreeWalk>(tree: &T, cap: usize) -> Vec<String> {
    fn walk<T: TreeWalk>(tree: &T, key: NodeKey, depth: usize, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        match tree.node_type(key) {
            Some(NodeType::Document) => out.push(format!("{indent}#document")),
            Some(NodeType::ShadowRoot) => out.push(format!("{indent}#shadow-root")),
            Some(NodeType::Element) => {
                let name = tree.tag_name(key).unwrap_or("?");
                let mut line = format!("{indent}<{name}");
                for attr in ["id", "class", "src", "href", "style"] {
                    if let Some(value) = tree.attr(key, attr).filter(|v| !v.is_empty()) {
                        line.push_str(&format!(r#" {attr}="{}""#, preview(value)));
                    }
                }
                line.push('>');
                out.push(line);
                if let Some(root) = tree.shadow_root(key) {
                    walk(tree, root, depth + 1, out, left);
                }
            }
            Some(NodeType::Text) => {
                let t = tree.text(key).unwrap_or("").replace('\n', " ");
                let t = t.trim();
                if !t.is_empty() {
                    out.push(format!("{indent}\"{}\"", preview(t)));
                }
            }
            Some(NodeType::Comment) => {
                let t = tree.text(key).unwrap_or("").replace('\n', " ");
                out.push(format!("{indent}<!-- {} -->", preview(&t)));
            }
            None => return,
        }
        for child in tree.children(key) {
            walk(tree, *child, depth + 1, out, left);
        }
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(tree, tree.document(), 0, &mut out, &mut left);
    out
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}
