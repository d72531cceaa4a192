//! Classes and ids the engine owns.

pub const SIDEBAR_LOGO: &str = "ha-rebrand-logo";
pub const LOGIN_LOGO: &str = "ha-rebrand-login-logo";
pub const LOADING_LOGO: &str = "ha-rebrand-loading-logo";
pub const HIDDEN: &str = "ha-rebrand-hidden";
pub const COLOR_STYLE_ID: &str = "ha-rebrand-colors";

/// Every injected logo image, whichever region it lives in.
pub const INJECTED_LOGOS: [&str; 3] = [SIDEBAR_LOGO, LOGIN_LOGO, LOADING_LOGO];

pub(crate) fn class_selector(class: &str) -> String {
    format!(".{class}")
}

/// `.ha-rebrand-logo, .ha-rebrand-login-logo, .ha-rebrand-loading-logo`
pub(crate) fn injected_logo_selector() -> String {
    INJECTED_LOGOS
        .iter()
        .map(|class| class_selector(class))
        .collect::<Vec<_>>()
        .join(", ")
}
