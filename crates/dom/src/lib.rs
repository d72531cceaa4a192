pub mod head;
pub mod outline;
pub mod tree;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

mod arena;
mod types;

use memchr::{memchr, memchr2};

pub use crate::arena::HostDom;
pub use crate::tree::{Descendants, HostTree, TreeWalk};
pub use crate::types::{DomError, MutationRecord, NodeKey, NodeType};

/// Replace every ASCII-case-insensitive occurrence of `needle`.
///
/// Returns `None` when nothing matched, so callers can skip the write.
pub fn replace_ignore_ascii_case(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return None;
    }
    let mut out = String::with_capacity(haystack.len());
    let mut last = 0;
    let mut from = 0;
    while let Some(pos) = find_ignore_ascii_case(hay, needle.as_bytes(), from) {
        out.push_str(&haystack[last..pos]);
        out.push_str(replacement);
        last = pos + n;
        from = last;
    }
    if last == 0 {
        return None;
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

fn find_ignore_ascii_case(hay: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    let n = needle.len();
    if n == 0 {
        return Some(from);
    }
    let hay_len = hay.len();
    if hay_len < n {
        return None;
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    let mut i = from;
    while i + n <= hay_len {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let rel = rel?;
        let pos = i + rel;
        if pos + n <= hay_len && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return Some(pos);
        }
        i = pos + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_case_variant() {
        assert_eq!(
            replace_ignore_ascii_case("Home Assistant - HOME ASSISTANT", "home assistant", "Acme")
                .as_deref(),
            Some("Acme - Acme")
        );
    }

    #[test]
    fn no_match_yields_none() {
        assert_eq!(replace_ignore_ascii_case("Overview", "Home Assistant", "Acme"), None);
        assert_eq!(replace_ignore_ascii_case("Overview", "", "Acme"), None);
    }

    #[test]
    fn replacement_is_not_rescanned() {
        assert_eq!(
            replace_ignore_ascii_case("Home Assistant", "Home Assistant", "My Home Assistant")
                .as_deref(),
            Some("My Home Assistant")
        );
    }

    #[test]
    fn non_alpha_first_byte_matches() {
        assert_eq!(
            replace_ignore_ascii_case("a [beta] b", "[BETA]", "x").as_deref(),
            Some("a x b")
        );
        assert_eq!(replace_ignore_ascii_case("ab", "abc", "x"), None);
    }
}
