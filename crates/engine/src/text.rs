//! Literal text substitution across nested shadow trees.
//!
//! Search strings are matched byte-for-byte: `"a.b"` only matches `a.b`,
//! never `axb`. Pairs apply one after another to each text node, each pair
//! seeing the output of the previous one. Text inside `style` and `script`
//! is left alone. A node still holding the text it was last given is not
//! rewritten again, so a replacement may contain its own search string.

use crate::MAX_SHADOW_DEPTH;
use dom::{HostTree, NodeKey, NodeType, TreeWalk};
use memchr::memmem::Finder;
use std::collections::{BTreeMap, HashMap};

struct Replacement {
    finder: Finder<'static>,
    replacement: String,
}

impl Replacement {
    fn replace_all(&self, haystack: &str) -> Option<String> {
        let needle_len = self.finder.needle().len();
        let mut matches = self.finder.find_iter(haystack.as_bytes()).peekable();
        matches.peek()?;
        let mut out = String::with_capacity(haystack.len());
        let mut last = 0;
        for pos in matches {
            out.push_str(&haystack[last..pos]);
            out.push_str(&self.replacement);
            last = pos + needle_len;
        }
        out.push_str(&haystack[last..]);
        Some(out)
    }
}

/// Matchers built once per configuration.
#[derive(Default)]
pub struct CompiledReplacements {
    pairs: Vec<Replacement>,
}

impl CompiledReplacements {
    /// Empty search strings are skipped; they would match everywhere.
    pub fn compile(replacements: &BTreeMap<String, String>) -> Self {
        let pairs = replacements
            .iter()
            .filter(|(search, _)| !search.is_empty())
            .map(|(search, replacement)| Replacement {
                finder: Finder::new(search.as_bytes()).into_owned(),
                replacement: replacement.clone(),
            })
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// The rewritten text, or `None` when no pair changes it.
    pub fn rewrite(&self, text: &str) -> Option<String> {
        let mut current: Option<String> = None;
        for pair in &self.pairs {
            let source = current.as_deref().unwrap_or(text);
            if let Some(next) = pair.replace_all(source) {
                current = Some(next);
            }
        }
        current.filter(|out| out != text)
    }
}

/// Text written per node by earlier passes.
#[derive(Debug, Default)]
pub struct WrittenText {
    nodes: HashMap<NodeKey, String>,
}

impl WrittenText {
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn is_current(&self, key: NodeKey, text: &str) -> bool {
        self.nodes.get(&key).is_some_and(|written| written == text)
    }

    // Keys are never reused, so entries for removed nodes can only go stale.
    fn prune<T: TreeWalk>(&mut self, tree: &T) {
        self.nodes.retain(|key, _| tree.is_connected(*key));
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    pub nodes_changed: usize,
    /// Shadow roots whose text was visited.
    pub shadow_roots: usize,
    pub depth_limited: bool,
}

/// Rewrite every text node under `root`, then every shadow tree reachable
/// from it, up to [`MAX_SHADOW_DEPTH`] roots deep.
pub fn substitute<T: HostTree>(
    tree: &mut T,
    compiled: &CompiledReplacements,
    written: &mut WrittenText,
    root: NodeKey,
) -> SubstitutionReport {
    let mut report = SubstitutionReport::default();
    if compiled.is_empty() {
        return report;
    }
    let mut pass = Pass {
        compiled,
        written: &mut *written,
        report: &mut report,
    };
    pass.rewrite_scope(tree, root);
    pass.substitute_shadows(tree, root, 0);
    written.prune(&*tree);
    log::trace!(
        target: "rebrand.text",
        "rewrote {} text nodes across {} shadow roots",
        report.nodes_changed,
        report.shadow_roots
    );
    report
}

struct Pass<'a> {
    compiled: &'a CompiledReplacements,
    written: &'a mut WrittenText,
    report: &'a mut SubstitutionReport,
}

impl Pass<'_> {
    fn substitute_shadows<T: HostTree>(&mut self, tree: &mut T, scope: NodeKey, depth: usize) {
        if depth >= MAX_SHADOW_DEPTH {
            log::warn!(
                target: "rebrand.text",
                "shadow depth limit ({MAX_SHADOW_DEPTH}) reached, skipping deeper roots"
            );
            self.report.depth_limited = true;
            return;
        }
        let roots: Vec<NodeKey> = tree
            .descendants(scope)
            .filter_map(|key| tree.shadow_root(key))
            .collect();
        for shadow in roots {
            self.report.shadow_roots += 1;
            self.rewrite_scope(tree, shadow);
            self.substitute_shadows(tree, shadow, depth + 1);
        }
    }

    // Collect first, write after: writes must not disturb the walk.
    fn rewrite_scope<T: HostTree>(&mut self, tree: &mut T, scope: NodeKey) {
        let updates: Vec<(NodeKey, String)> = tree
            .descendants(scope)
            .filter(|key| tree.node_type(*key) == Some(NodeType::Text))
            .filter(|key| !in_raw_text(&*tree, *key))
            .filter_map(|key| {
                let text = tree.text(key)?;
                if self.written.is_current(key, text) {
                    return None;
                }
                self.compiled.rewrite(text).map(|out| (key, out))
            })
            .collect();
        for (key, text) in updates {
            match tree.set_text(key, &text) {
                Ok(()) => {
                    self.report.nodes_changed += 1;
                    self.written.nodes.insert(key, text);
                }
                Err(err) => log::debug!(target: "rebrand.text", "text write skipped: {err}"),
            }
        }
    }
}

fn in_raw_text<T: TreeWalk>(tree: &T, key: NodeKey) -> bool {
    tree.parent(key)
        .and_then(|parent| tree.tag_name(parent))
        .is_some_and(|name| name == "style" || name == "script")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::fixtures::{element, shadow_chain, text};
    use dom::{HostDom, HostTree};

    fn compiled(pairs: &[(&str, &str)]) -> CompiledReplacements {
        CompiledReplacements::compile(
            &pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn matches_literally() {
        let c = compiled(&[("a.b (c)*", "X")]);
        assert_eq!(c.rewrite("a.b (c)* and axb (c)"), Some("X and axb (c)".to_string()));
        assert_eq!(c.rewrite("axb cc"), None);
    }

    #[test]
    fn pairs_chain_in_key_order() {
        let c = compiled(&[("Assistant", "Helper"), ("Home", "Acme")]);
        assert_eq!(c.rewrite("Home Assistant").as_deref(), Some("Acme Helper"));
    }

    #[test]
    fn skips_empty_search_and_unchanged_results() {
        let c = compiled(&[("", "boom"), ("same", "same")]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.rewrite("the same text"), None);
    }

    #[test]
    fn multibyte_text_is_handled() {
        let c = compiled(&[("Zuhause", "Heim")]);
        assert_eq!(c.rewrite("Grüße Zuhause ✓").as_deref(), Some("Grüße Heim ✓"));
    }

    #[test]
    fn empty_set_touches_nothing() {
        let (mut dom, texts) = shadow_chain(3, "Home Assistant");
        let body = dom.body().unwrap();
        let report = substitute(&mut dom, &CompiledReplacements::default(), &mut WrittenText::default(), body);
        assert_eq!(report, SubstitutionReport::default());
        assert_eq!(dom.text(texts[0]), Some("Home Assistant"));
        assert_eq!(dom.pending_records(), 0);
    }

    #[test]
    fn depth_bound_stops_at_ten_roots() {
        let (mut dom, texts) = shadow_chain(12, "Home Assistant");
        let body = dom.body().unwrap();
        let report = substitute(
            &mut dom,
            &compiled(&[("Home Assistant", "Acme")]),
            &mut WrittenText::default(),
            body,
        );
        assert!(report.depth_limited);
        assert_eq!(report.nodes_changed, MAX_SHADOW_DEPTH);
        for (level, key) in texts.iter().enumerate() {
            let expected = if level < MAX_SHADOW_DEPTH { "Acme" } else { "Home Assistant" };
            assert_eq!(dom.text(*key), Some(expected), "level {level}");
        }
    }

    #[test]
    fn style_and_script_text_is_left_alone() {
        let mut dom = HostDom::new();
        let body = dom.body().unwrap();
        let style = element(&mut dom, body, "style", &[]);
        let css = text(&mut dom, style, ".home-assistant { color: red }");
        let p = element(&mut dom, body, "p", &[]);
        let para = text(&mut dom, p, "Welcome to home-assistant");
        let _ = dom.take_records();

        let report = substitute(
            &mut dom,
            &compiled(&[("home-assistant", "acme")]),
            &mut WrittenText::default(),
            body,
        );
        assert_eq!(report.nodes_changed, 1);
        assert_eq!(dom.text(css), Some(".home-assistant { color: red }"));
        assert_eq!(dom.text(para), Some("Welcome to acme"));
    }

    #[test]
    fn second_pass_writes_nothing() {
        let (mut dom, _) = shadow_chain(4, "Home Assistant");
        let body = dom.body().unwrap();
        let c = compiled(&[("Home Assistant", "Acme Home")]);
        let mut written = WrittenText::default();
        substitute(&mut dom, &c, &mut written, body);
        let _ = dom.take_records();
        let report = substitute(&mut dom, &c, &mut written, body);
        assert_eq!(report.nodes_changed, 0);
        assert_eq!(dom.pending_records(), 0);
    }

    #[test]
    fn self_containing_replacement_expands_once() {
        let mut dom = HostDom::new();
        let body = dom.body().unwrap();
        let p = element(&mut dom, body, "p", &[]);
        let para = text(&mut dom, p, "Welcome to Home Assistant");
        let c = compiled(&[("Home Assistant", "My Home Assistant")]);
        let mut written = WrittenText::default();

        for _ in 0..3 {
            substitute(&mut dom, &c, &mut written, body);
        }
        assert_eq!(dom.text(para), Some("Welcome to My Home Assistant"));

        // Host puts its own text back: rewritten again, once.
        dom.set_text(para, "Home Assistant").unwrap();
        substitute(&mut dom, &c, &mut written, body);
        substitute(&mut dom, &c, &mut written, body);
        assert_eq!(dom.text(para), Some("My Home Assistant"));
    }

    #[test]
    fn removed_nodes_are_forgotten() {
        let mut dom = HostDom::new();
        let body = dom.body().unwrap();
        let p = element(&mut dom, body, "p", &[]);
        text(&mut dom, p, "Home Assistant");
        let c = compiled(&[("Home Assistant", "Acme")]);
        let mut written = WrittenText::default();
        substitute(&mut dom, &c, &mut written, body);
        assert_eq!(written.nodes.len(), 1);

        dom.remove(p).unwrap();
        substitute(&mut dom, &c, &mut written, body);
        assert!(written.nodes.is_empty());
    }
}
