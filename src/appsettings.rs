use config::{Config, ConfigError, Environment, File};
use tasker_models::settings::Settings;

/// Reads `appsettings`, then the optional `appsettings.local` overrides, then
/// `APP__*` environment variables (`APP__DATABASE__URL`, ...).
pub fn load() -> Result<Settings, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("appsettings").required(true))
        .add_source(File::with_name("appsettings.local").required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    settings.try_deserialize()
}
