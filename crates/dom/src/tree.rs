//! Capability-scoped access to a host tree.
//!
//! `TreeWalk` is the read side: enough to walk children, step into
//! encapsulated roots and read element state. `HostTree` adds the writes the
//! overlay performs. Everything above this crate is written against these two
//! traits, so fixture trees and a live document are interchangeable.
//!
//! Invariants:
//! - `children` never includes a shadow root; shadow roots are reached only
//!   through `shadow_root`.
//! - `parent` of a shadow root is `None`; its host comes from `shadow_host`.
//! - Tag and attribute names are canonical ASCII-lowercase.

use crate::types::{DomError, MutationRecord, NodeKey, NodeType};

pub trait TreeWalk {
    fn document(&self) -> NodeKey;
    fn node_type(&self, key: NodeKey) -> Option<NodeType>;
    fn tag_name(&self, key: NodeKey) -> Option<&str>;
    fn attr(&self, key: NodeKey, name: &str) -> Option<&str>;
    fn children(&self, key: NodeKey) -> &[NodeKey];
    fn parent(&self, key: NodeKey) -> Option<NodeKey>;
    fn shadow_root(&self, key: NodeKey) -> Option<NodeKey>;
    fn shadow_host(&self, key: NodeKey) -> Option<NodeKey>;
    /// Character data of a text or comment node.
    fn text(&self, key: NodeKey) -> Option<&str>;
    /// Resolved value of a custom property on the root element.
    fn computed_root_property(&self, name: &str) -> Option<&str>;
    /// The environment's `prefers-color-scheme: dark` answer.
    fn prefers_dark_color_scheme(&self) -> bool;

    fn is_element(&self, key: NodeKey) -> bool {
        self.node_type(key) == Some(NodeType::Element)
    }

    fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.attr(key, "class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Attached to the document, possibly through any number of shadow hosts.
    fn is_connected(&self, key: NodeKey) -> bool {
        let document = self.document();
        let mut current = key;
        loop {
            if current == document {
                return true;
            }
            if self.node_type(current).is_none() {
                return false;
            }
            current = match self.parent(current).or_else(|| self.shadow_host(current)) {
                Some(next) => next,
                None => return false,
            };
        }
    }

    /// Light-tree containment; never crosses an encapsulation boundary.
    fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = Some(node);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    /// Concatenated text of the light tree under `key`.
    fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        match self.node_type(key) {
            Some(NodeType::Text) | Some(NodeType::Comment) => {
                out.push_str(self.text(key).unwrap_or(""));
            }
            Some(_) => {
                for node in self.descendants(key) {
                    if self.node_type(node) == Some(NodeType::Text) {
                        out.push_str(self.text(node).unwrap_or(""));
                    }
                }
            }
            None => {}
        }
        out
    }

    fn element_children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.children(key)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Pre-order walk of the light tree below `scope`, excluding `scope`.
    fn descendants(&self, scope: NodeKey) -> Descendants<'_, Self> {
        let mut stack: Vec<NodeKey> = self.children(scope).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    fn document_element(&self) -> Option<NodeKey> {
        self.children(self.document())
            .iter()
            .copied()
            .find(|key| self.is_element(*key))
    }

    fn head(&self) -> Option<NodeKey> {
        self.root_child_named("head")
    }

    fn body(&self) -> Option<NodeKey> {
        self.root_child_named("body")
    }

    fn root_child_named(&self, name: &str) -> Option<NodeKey> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .copied()
            .find(|key| self.tag_name(*key) == Some(name))
    }
}

pub struct Descendants<'a, T: ?Sized> {
    tree: &'a T,
    stack: Vec<NodeKey>,
}

impl<T: TreeWalk + ?Sized> Iterator for Descendants<'_, T> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let current = self.stack.pop()?;
        let children = self.tree.children(current);
        self.stack.extend(children.iter().rev().copied());
        Some(current)
    }
}

pub trait HostTree: TreeWalk {
    fn create_element(&mut self, name: &str) -> NodeKey;
    fn create_text(&mut self, text: &str) -> NodeKey;
    /// Insert a detached `child` into `parent` before `before`, or at the end
    /// when `before` is `None`.
    fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError>;
    /// Detach a node and drop its subtree.
    fn remove(&mut self, key: NodeKey) -> Result<(), DomError>;
    fn set_attr(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError>;
    fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError>;
    fn attach_shadow(&mut self, host: NodeKey) -> Result<NodeKey, DomError>;
    /// Drain the mutation records queued since the last call.
    fn take_records(&mut self) -> Vec<MutationRecord>;

    fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    fn prepend(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let first = self.children(parent).first().copied();
        self.insert_before(parent, child, first)
    }

    /// Returns `false` without writing when the value is already current.
    fn set_attr_if_changed(
        &mut self,
        key: NodeKey,
        name: &str,
        value: &str,
    ) -> Result<bool, DomError> {
        if self.attr(key, name) == Some(value) {
            return Ok(false);
        }
        self.set_attr(key, name, value)?;
        Ok(true)
    }

    fn add_class(&mut self, key: NodeKey, class: &str) -> Result<bool, DomError> {
        if self.has_class(key, class) {
            return Ok(false);
        }
        let list = match self.attr(key, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr(key, "class", &list)?;
        Ok(true)
    }

    /// Replace all children with a single text node, like assigning
    /// `textContent`.
    fn set_text_content(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        match self.node_type(key) {
            Some(NodeType::Text) | Some(NodeType::Comment) => self.set_text(key, text),
            Some(_) => {
                let old = self.children(key).to_vec();
                for child in old {
                    self.remove(child)?;
                }
                if !text.is_empty() {
                    let node = self.create_text(text);
                    self.append_child(key, node)?;
                }
                Ok(())
            }
            None => Err(DomError::MissingNode(key)),
        }
    }
}
