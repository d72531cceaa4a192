pub mod inline;
pub mod query;
pub mod syntax;
pub mod theme;
pub mod values;

// Re-exports so other crates can just use `css::...` nicely.
pub use inline::{get_inline_property, set_inline_property};
pub use query::{closest, deep_query_all, get_element_by_id, matches, query_selector, query_selector_all};
pub use syntax::{AttrOp, Compound, Declaration, Selector, SelectorList, parse_declarations, parse_selector_list};
pub use theme::{ColorScheme, SchemeSource, detect_color_scheme, is_dark_mode};
pub use values::{parse_color, relative_luminance};
