use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Analytics backend address. Absence is reported per request, not at startup.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendSettings {
    /// Blank counts as unset
    pub fn base_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssistantMode {
    Direct,
    #[default]
    Relay,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AssistantSettings {
    #[serde(default)]
    pub mode: AssistantMode,
    /// Relay origin; defaults to this service's own bind address
    #[serde(default)]
    pub relay_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionSettings {
    /// Session file; the session lives in memory only when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AppConfig {
    pub fn relay_url(&self) -> String {
        match self.assistant.relay_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => local_origin(&self.server.bind),
        }
    }
}

/// Origin for reaching this service from itself; a wildcard bind dials loopback
fn local_origin(bind: &str) -> String {
    match bind.trim().parse::<SocketAddr>() {
        Ok(addr) if addr.ip().is_unspecified() => {
            let loopback = match addr {
                SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            };
            format!("http://{}", SocketAddr::new(loopback, addr.port()))
        }
        _ => format!("http://{}", bind.trim()),
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Optional `config/dashboard.{toml,...}` overlaid with `FLEET__SECTION__KEY` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("FLEET")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
