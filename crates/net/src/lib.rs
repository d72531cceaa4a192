use core_types::BrandingConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where the integration serves the saved branding settings.
pub const CONFIG_PATH: &str = "/local/ha_rebrand/config.json";

const USER_AGENT: &str = "ha-rebrand/0.1";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Malformed(String),
    InvalidUrl(String),
    Io(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(err) => write!(f, "network error: {err}"),
            FetchError::Status(code) => write!(f, "config fetch failed with status {code}"),
            FetchError::Malformed(err) => write!(f, "malformed config: {err}"),
            FetchError::InvalidUrl(err) => write!(f, "invalid config url: {err}"),
            FetchError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::Io(err)
    }
}

/// The one thing the engine needs from the settings backend.
///
/// Every failure is reported, never retried here; retry policy belongs to
/// the caller.
pub trait ConfigStore: Send {
    fn fetch(&mut self) -> Result<BrandingConfig, FetchError>;

    fn describe(&self) -> String {
        String::from("config store")
    }
}

pub fn parse_config(body: &str) -> Result<BrandingConfig, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// Fetches the settings document from a running dashboard.
///
/// The dashboard authenticates static files through its session; outside a
/// browser the same access is granted by a long-lived access token.
pub struct HttpConfigStore {
    agent: ureq::Agent,
    url: Url,
    token: Option<String>,
}

impl HttpConfigStore {
    /// `base` is the dashboard origin, e.g. `http://homeassistant.local:8123`.
    pub fn new(base: &str, token: Option<String>) -> Result<Self, FetchError> {
        let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let url = base
            .join(CONFIG_PATH)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let agent = ureq::AgentBuilder::new()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Ok(Self { agent, url, token })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl ConfigStore for HttpConfigStore {
    fn fetch(&mut self) -> Result<BrandingConfig, FetchError> {
        let mut request = self
            .agent
            .get(self.url.as_str())
            .set("Accept", "application/json")
            .set("Cache-Control", "no-cache");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(FetchError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Network(transport.to_string()));
            }
        };
        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status(status));
        }
        log::debug!(target: "rebrand.bootstrap", "fetched {} ({status})", self.url);
        let body = response.into_string()?;
        parse_config(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Reads the settings document from disk, the way the integration stores it
/// under `www/ha_rebrand/config.json`.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for FileConfigStore {
    fn fetch(&mut self) -> Result<BrandingConfig, FetchError> {
        let body = std::fs::read_to_string(&self.path)?;
        parse_config(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
