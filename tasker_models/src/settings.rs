use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct HttpSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DispatchSettings {
    #[serde(default = "default_dispatch_enabled")]
    pub enabled: bool,
    #[serde(default = "default_dispatch_interval")]
    pub interval_secs: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            enabled: default_dispatch_enabled(),
            interval_secs: default_dispatch_interval(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub http: HttpSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub dispatch: DispatchSettings,
}

fn default_bind_address() -> String {
    "0.0.0.0:3030".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_dispatch_enabled() -> bool {
    true
}

fn default_dispatch_interval() -> u64 {
    60
}
