// A single CSS property: "color: red"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

/// One simple selector inside a compound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    Universal,
    Type(String),  // element/tag selector
    Id(String),    // #id selector
    Class(String), // .class selector
    Attribute { name: String, op: AttrOp },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrOp {
    Exists,           // [attr]
    Equals(String),   // [attr="v"]
    Includes(String), // [attr~="v"]
    Prefix(String),   // [attr^="v"]
    Suffix(String),   // [attr$="v"]
    Contains(String), // [attr*="v"]
}

/// Simple selectors that must all match the same element, e.g.
/// `img[alt="Home Assistant"]` or `div.logo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compound(pub Vec<Selector>);

/// A comma-separated group; an element matches if any compound does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList(pub Vec<Compound>);

impl SelectorList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// input: "color: red; font-size: 12px;"
// output: vec![Declaration { name: "color", value: "red" }, Declaration { name: "font-size", value: "12px" }]
pub fn parse_declarations(input: &str) -> Vec<Declaration> {
    input
        .split(';')
        .filter_map(|pair| {
            let (n, v) = pair.split_once(':')?;
            let name = n.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            let value = v.trim().to_string();
            Some(Declaration { name, value })
        })
        .collect()
}

// input: "a[href*=\"foundation\"], div.footer"
// output: SelectorList(vec![Compound(..), Compound(..)])
//
// Only compound selectors are supported: combinators make the compound
// invalid and it is dropped, like an unknown rule in a stylesheet.
pub fn parse_selector_list(input: &str) -> SelectorList {
    SelectorList(
        split_top_level(input)
            .filter_map(|part| {
                let compound = parse_compound(part);
                if compound.is_none() && !part.trim().is_empty() {
                    log::trace!(target: "css.selector", "dropped unsupported selector {part:?}");
                }
                compound
            })
            .collect(),
    )
}

// Split on commas that are not inside brackets or quotes.
fn split_top_level(input: &str) -> impl Iterator<Item = &str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts.into_iter()
}

fn parse_compound(s: &str) -> Option<Compound> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'*' if i == 0 => {
                parts.push(Selector::Universal);
                i += 1;
            }
            b'#' => {
                let (ident, next) = read_ident(s, i + 1)?;
                parts.push(Selector::Id(ident.to_string()));
                i = next;
            }
            b'.' => {
                let (ident, next) = read_ident(s, i + 1)?;
                parts.push(Selector::Class(ident.to_string()));
                i = next;
            }
            b'[' => {
                let close = s[i..].find(']')? + i;
                parts.push(parse_attribute(&s[i + 1..close])?);
                i = close + 1;
            }
            _ if i == 0 => {
                let (ident, next) = read_ident(s, 0)?;
                parts.push(Selector::Type(ident.to_ascii_lowercase()));
                i = next;
            }
            _ => return None,
        }
    }
    Some(Compound(parts))
}

fn read_ident(s: &str, start: usize) -> Option<(&str, usize)> {
    let end = s[start..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map_or(s.len(), |rel| start + rel);
    if end == start {
        return None;
    }
    Some((&s[start..end], end))
}

// input: `rel*="icon"`, `viewBox`, `alt="Home Assistant"`
fn parse_attribute(body: &str) -> Option<Selector> {
    let body = body.trim();
    let Some(eq) = body.find('=') else {
        let (name, end) = read_ident(body, 0)?;
        if end != body.len() {
            return None;
        }
        return Some(Selector::Attribute {
            name: name.to_ascii_lowercase(),
            op: AttrOp::Exists,
        });
    };
    let (name_part, modifier) = match body[..eq].chars().last() {
        Some(c @ ('~' | '^' | '$' | '*')) => (&body[..eq - 1], Some(c)),
        _ => (&body[..eq], None),
    };
    let name = name_part.trim().to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    let raw = body[eq + 1..].trim();
    let value = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(raw)
        .to_string();
    let op = match modifier {
        None => AttrOp::Equals(value),
        Some('~') => AttrOp::Includes(value),
        Some('^') => AttrOp::Prefix(value),
        Some('$') => AttrOp::Suffix(value),
        _ => AttrOp::Contains(value),
    };
    Some(Selector::Attribute { name, op })
}
