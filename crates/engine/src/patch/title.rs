use core_types::BrandingConfig;
use dom::head::{document_title, set_document_title};
use dom::{DomError, HostTree, replace_ignore_ascii_case};

/// The product name the host puts in its titles.
pub const HOST_PRODUCT_NAME: &str = "Home Assistant";

/// Title writes converge: a title the engine itself produced is never
/// rewritten again, and a rewrite that yields the same text is skipped.
#[derive(Debug, Default)]
pub(crate) struct TitleGuard {
    last_written: Option<String>,
}

impl TitleGuard {
    pub fn reset(&mut self) {
        self.last_written = None;
    }

    /// Returns whether the title was written.
    pub fn apply<T: HostTree>(&mut self, tree: &mut T, config: &BrandingConfig) -> Result<bool, DomError> {
        let Some(configured) = config.document_title.as_deref() else {
            return Ok(false);
        };
        let current = document_title(tree);
        if self.last_written.as_deref() == Some(current.as_str()) {
            return Ok(false);
        }
        let next = match replace_ignore_ascii_case(&current, HOST_PRODUCT_NAME, configured) {
            Some(next) if next != current => next,
            Some(_) => return Ok(false),
            None if current.is_empty() => configured.to_string(),
            None => return Ok(false),
        };
        set_document_title(tree, &next)?;
        log::debug!(target: "rebrand.patch", "title {current:?} -> {next:?}");
        self.last_written = Some(next);
        Ok(true)
    }
}
