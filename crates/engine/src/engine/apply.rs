use super::Engine;
use crate::locate;
use crate::observer::ObserveOptions;
use crate::patch::{PatchContext, color, favicon, footer, logos, sidebar};
use crate::text;
use crate::theme_sync;
use bus::RebrandEvent;
use core_types::{BrandingConfig, ObserverKind};
use css::is_dark_mode;
use dom::head::find_title_element;
use dom::{DomError, HostTree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// No configuration has loaded yet.
    NoConfig,
    /// Another pass was already running.
    Busy,
    /// The pass ran; `sidebar` tells whether the sidebar was found.
    Applied { sidebar: bool },
}

impl ApplyOutcome {
    pub fn sidebar_applied(self) -> bool {
        matches!(self, ApplyOutcome::Applied { sidebar: true })
    }
}

// A failed write leaves that step unapplied; the next pass tries again.
fn settle<V: Default>(step: &str, result: Result<V, DomError>) -> V {
    result.unwrap_or_else(|err| {
        log::debug!(target: "rebrand.patch", "{step} not applied: {err}");
        V::default()
    })
}

impl Engine {
    /// One full pass: favicon, title, sidebar, logos, text, color.
    pub(super) fn apply<T: HostTree>(&mut self, tree: &mut T) -> ApplyOutcome {
        let Some(config) = self.config.clone() else {
            return ApplyOutcome::NoConfig;
        };
        if self.applying {
            log::trace!(target: "rebrand.patch", "apply already running, dropped");
            return ApplyOutcome::Busy;
        }
        self.applying = true;
        let sidebar = self.apply_pass(tree, &config);
        self.applying = false;

        self.apply_passes += 1;
        self.events.push(RebrandEvent::Applied { sidebar });
        log::debug!(target: "rebrand.patch", "apply pass {} done (sidebar: {sidebar})", self.apply_passes);
        ApplyOutcome::Applied { sidebar }
    }

    fn apply_pass<T: HostTree>(&mut self, tree: &mut T, config: &BrandingConfig) -> bool {
        let ctx = PatchContext {
            config,
            dark: config.logo_dark().is_some() && is_dark_mode(tree),
        };

        settle("favicon", favicon::apply(tree, config));

        settle("title", self.title.apply(tree, config));
        self.ensure_title_observer(tree, config);

        let sidebar = match self.locator.sidebar_root(tree) {
            Some(root) => match sidebar::apply(tree, root, &ctx) {
                Ok(changed) => {
                    if changed {
                        log::trace!(target: "rebrand.patch", "sidebar updated");
                    }
                    true
                }
                Err(err) => {
                    log::debug!(target: "rebrand.patch", "sidebar not applied: {err}");
                    false
                }
            },
            None => false,
        };

        settle("logos", logos::generic(tree, &ctx));
        if let Some(root) = locate::login_root(tree) {
            settle("login logo", logos::login(tree, root, &ctx));
        }
        if let Some(root) = locate::loading_root(tree) {
            settle("loading logo", logos::loading(tree, root, &ctx));
            if config.hide_footer_branding {
                settle("footer", footer::suppress(tree, root));
            }
        }

        if let Some(root) = locate::text_root(tree) {
            text::substitute(tree, &self.replacements, &mut self.written_text, root);
        }

        settle("primary color", color::apply(tree, config));

        if config.logo_dark().is_some() {
            self.ensure_theme_observer(tree);
        }
        sidebar
    }

    fn ensure_title_observer<T: HostTree>(&mut self, tree: &mut T, config: &BrandingConfig) {
        if self.title_observer || config.document_title.is_none() {
            return;
        }
        let Some(title) = find_title_element(tree) else {
            return;
        };
        let options = ObserveOptions {
            child_list: true,
            character_data: true,
            subtree: true,
            attributes: None,
        };
        self.observers.observe(tree, ObserverKind::Title, title, options);
        self.title_observer = true;
    }

    fn ensure_theme_observer<T: HostTree>(&mut self, tree: &mut T) {
        if self.theme_observer {
            return;
        }
        theme_sync::observe_theme(tree, &mut self.observers);
        self.theme_observer = true;
        log::debug!(target: "rebrand.theme", "theme observers installed");
    }
}
