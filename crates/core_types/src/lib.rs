use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type TimerId = u64;

/// Branding settings as served by the config store.
///
/// Every string field is optional and an empty string counts as unset: the
/// store writes `""` for fields cleared in the panel. Unknown keys are
/// ignored so older and newer stores stay readable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingConfig {
    #[serde(deserialize_with = "non_empty")]
    pub brand_name: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub logo: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub logo_dark: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub favicon: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub sidebar_title: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub document_title: Option<String>,
    #[serde(deserialize_with = "non_empty")]
    pub primary_color: Option<String>,
    #[serde(deserialize_with = "replacement_map")]
    pub replacements: BTreeMap<String, String>,
    #[serde(alias = "hide_open_home_foundation")]
    pub hide_footer_branding: bool,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            brand_name: None,
            logo: None,
            logo_dark: None,
            favicon: None,
            sidebar_title: None,
            document_title: None,
            primary_color: None,
            replacements: BTreeMap::new(),
            hide_footer_branding: true,
        }
    }
}

impl BrandingConfig {
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn logo_dark(&self) -> Option<&str> {
        self.logo_dark.as_deref()
    }

    /// The logo to show for the given scheme; the light logo stands in when
    /// no dark variant is configured.
    pub fn logo_for(&self, dark: bool) -> Option<&str> {
        if dark {
            self.logo_dark().or_else(|| self.logo())
        } else {
            self.logo()
        }
    }

    /// Alt text for injected logos.
    pub fn logo_alt(&self) -> &str {
        self.brand_name.as_deref().unwrap_or("Logo")
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

// `null` reads as no replacements.
fn replacement_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    let value: Option<BTreeMap<String, String>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObserverKind {
    /// Waits for the application root to render.
    HostWait,
    /// Re-applies while the dashboard re-renders.
    Main,
    /// Follows the document title.
    Title,
    /// Follows theme-affecting attributes for logo swaps.
    Theme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationKind {
    /// In-app route change (`location-changed`).
    LocationChanged,
    /// History back/forward (`popstate`).
    PopState,
}

/// Lifecycle of the re-apply machinery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatcherState {
    Uninstalled,
    WaitingForHost,
    Active,
    Expired,
}
