use crate::tree::{HostTree, TreeWalk};
use crate::types::{DomError, MutationRecord, NodeKey, NodeType};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory host document.
///
/// Nodes live in an arena keyed by `NodeKey`. Keys are never reused: once a
/// subtree is removed its keys stop resolving, which is what lets callers
/// treat a stale handle as "detached" instead of pointing at a new node.
pub struct HostDom {
    nodes: Vec<NodeRecord>,
    live: HashMap<NodeKey, usize>,
    next_key: u32,
    document: NodeKey,
    records: Vec<MutationRecord>,
    root_properties: HashMap<String, String>,
    prefers_dark: bool,
}

impl HostDom {
    /// An empty document with `html`, `head` and `body` already in place.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            live: HashMap::new(),
            next_key: 1,
            document: NodeKey::INVALID,
            records: Vec::new(),
            root_properties: HashMap::new(),
            prefers_dark: false,
        };
        dom.document = dom.insert_node(NodeData::Document);
        let html = dom.create_element("html");
        let head = dom.create_element("head");
        let body = dom.create_element("body");
        dom.link(dom.document, html);
        dom.link(html, head);
        dom.link(html, body);
        dom
    }

    /// Set a resolved custom property on the root element, as a theme engine
    /// would. Queued as a `style` attribute change on `html`.
    pub fn set_root_property(&mut self, name: &str, value: &str) {
        self.root_properties
            .insert(name.to_string(), value.trim().to_string());
        if let Some(html) = self.document_element() {
            self.records.push(MutationRecord::Attributes {
                target: html,
                name: "style".to_string(),
            });
        }
    }

    /// Comments never take part in text substitution, but hosts built on
    /// template libraries leave them between every binding.
    pub fn create_comment(&mut self, text: &str) -> NodeKey {
        self.insert_node(NodeData::Comment {
            text: text.to_string(),
        })
    }

    pub fn set_prefers_dark(&mut self, dark: bool) {
        self.prefers_dark = dark;
    }

    pub fn pending_records(&self) -> usize {
        self.records.len()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    fn insert_node(&mut self, data: NodeData) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        let index = self.nodes.len();
        self.nodes.push(NodeRecord {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.live.insert(key, index);
        key
    }

    fn record(&self, key: NodeKey) -> Option<&NodeRecord> {
        self.live.get(&key).map(|index| &self.nodes[*index])
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        match self.live.get(&key) {
            Some(index) => Ok(&mut self.nodes[*index]),
            None => Err(DomError::MissingNode(key)),
        }
    }

    // Unchecked structural link used while building the initial skeleton.
    fn link(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(&parent_index) = self.live.get(&parent) {
            self.nodes[parent_index].children.push(child);
        }
        if let Some(&child_index) = self.live.get(&child) {
            self.nodes[child_index].parent = Some(parent);
        }
    }

    fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Some(record) = self.record(ancestor) else {
            return false;
        };
        let mut stack = Vec::new();
        stack.extend(record.children.iter().copied());
        if let NodeData::Element {
            shadow: Some(root), ..
        } = &record.data
        {
            stack.push(*root);
        }
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(child) = self.record(current) {
                stack.extend(child.children.iter().copied());
                if let NodeData::Element {
                    shadow: Some(root), ..
                } = &child.data
                {
                    stack.push(*root);
                }
            }
        }
        false
    }

    fn drop_subtree(&mut self, key: NodeKey) {
        let Some(index) = self.live.remove(&key) else {
            return;
        };
        let mut pending = std::mem::take(&mut self.nodes[index].children);
        if let NodeData::Element {
            shadow: Some(root), ..
        } = &self.nodes[index].data
        {
            pending.push(*root);
        }
        for child in pending {
            self.drop_subtree(child);
        }
    }
}

impl Default for HostDom {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeWalk for HostDom {
    fn document(&self) -> NodeKey {
        self.document
    }

    fn node_type(&self, key: NodeKey) -> Option<NodeType> {
        self.record(key).map(|record| match record.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element { .. } => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::Comment { .. } => NodeType::Comment,
            NodeData::ShadowRoot { .. } => NodeType::ShadowRoot,
        })
    }

    fn tag_name(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key)?.data {
            NodeData::Element { name, .. } => Some(name.as_ref()),
            _ => None,
        }
    }

    fn attr(&self, key: NodeKey, name: &str) -> Option<&str> {
        match &self.record(key)?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.record(key)
            .map(|record| record.children.as_slice())
            .unwrap_or(&[])
    }

    fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.record(key)?.parent
    }

    fn shadow_root(&self, key: NodeKey) -> Option<NodeKey> {
        match &self.record(key)?.data {
            NodeData::Element { shadow, .. } => *shadow,
            _ => None,
        }
    }

    fn shadow_host(&self, key: NodeKey) -> Option<NodeKey> {
        match &self.record(key)?.data {
            NodeData::ShadowRoot { host } => Some(*host),
            _ => None,
        }
    }

    fn text(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key)?.data {
            NodeData::Text { text } | NodeData::Comment { text } => Some(text.as_str()),
            _ => None,
        }
    }

    fn computed_root_property(&self, name: &str) -> Option<&str> {
        self.root_properties.get(name).map(String::as_str)
    }

    fn prefers_dark_color_scheme(&self) -> bool {
        self.prefers_dark
    }
}

impl HostTree for HostDom {
    fn create_element(&mut self, name: &str) -> NodeKey {
        self.insert_node(NodeData::Element {
            name: Arc::from(name.to_ascii_lowercase()),
            attributes: Vec::new(),
            shadow: None,
        })
    }

    fn create_text(&mut self, text: &str) -> NodeKey {
        self.insert_node(NodeData::Text {
            text: text.to_string(),
        })
    }

    fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: Option<NodeKey>,
    ) -> Result<(), DomError> {
        if parent == child || self.is_descendant(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        let parent_record = self.record(parent).ok_or(DomError::MissingNode(parent))?;
        if !parent_record.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        let position = match before {
            Some(before) => Some(
                parent_record
                    .children
                    .iter()
                    .position(|k| *k == before)
                    .ok_or(DomError::InvalidSibling { parent, before })?,
            ),
            None => None,
        };
        let child_record = self.record(child).ok_or(DomError::MissingNode(child))?;
        if child_record.parent.is_some()
            || matches!(
                child_record.data,
                NodeData::Document | NodeData::ShadowRoot { .. }
            )
        {
            return Err(DomError::InvalidParent(child));
        }
        let children = &mut self.record_mut(parent)?.children;
        match position {
            Some(pos) => children.insert(pos, child),
            None => children.push(child),
        }
        self.record_mut(child)?.parent = Some(parent);
        self.records.push(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    fn remove(&mut self, key: NodeKey) -> Result<(), DomError> {
        let record = self.record_mut(key)?;
        if let Some(parent) = record.parent.take() {
            if let Ok(parent_record) = self.record_mut(parent) {
                parent_record.children.retain(|k| *k != key);
            }
            self.records.push(MutationRecord::ChildList {
                target: parent,
                added: Vec::new(),
                removed: vec![key],
            });
        }
        self.drop_subtree(key);
        Ok(())
    }

    fn set_attr(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        match &mut self.record_mut(key)?.data {
            NodeData::Element { attributes, .. } => {
                match attributes.iter_mut().find(|(k, _)| **k == *name) {
                    Some((_, existing)) => {
                        existing.clear();
                        existing.push_str(value);
                    }
                    None => attributes.push((Arc::from(name.as_str()), value.to_string())),
                }
            }
            _ => return Err(DomError::WrongNodeKind(key)),
        }
        self.records.push(MutationRecord::Attributes { target: key, name });
        Ok(())
    }

    fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        match &mut self.record_mut(key)?.data {
            NodeData::Text { text: existing } | NodeData::Comment { text: existing } => {
                existing.clear();
                existing.push_str(text);
            }
            _ => return Err(DomError::WrongNodeKind(key)),
        }
        self.records
            .push(MutationRecord::CharacterData { target: key });
        Ok(())
    }

    fn attach_shadow(&mut self, host: NodeKey) -> Result<NodeKey, DomError> {
        match &self.record(host).ok_or(DomError::MissingNode(host))?.data {
            NodeData::Element { shadow: Some(_), .. } => {
                return Err(DomError::ShadowRootExists(host));
            }
            NodeData::Element { .. } => {}
            _ => return Err(DomError::WrongNodeKind(host)),
        }
        let root = self.insert_node(NodeData::ShadowRoot { host });
        if let NodeData::Element { shadow, .. } = &mut self.record_mut(host)?.data {
            *shadow = Some(root);
        }
        Ok(root)
    }

    fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }
}

struct NodeRecord {
    data: NodeData,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(
            self.data,
            NodeData::Document | NodeData::Element { .. } | NodeData::ShadowRoot { .. }
        )
    }
}

enum NodeData {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
        shadow: Option<NodeKey>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
    ShadowRoot {
        host: NodeKey,
    },
}
