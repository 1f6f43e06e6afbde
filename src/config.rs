use std::path::Path;
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:6011";
pub const DEFAULT_COLLECTION_PATH: &str = "/REST/ppl";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSettings {
    pub base_url: String,
    pub collection_path: String,
    pub timeout_ms: u64,
}

impl RemoteSettings {
    /// Full URL of the collection resource.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection_path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

impl Settings {
    /// Load settings from defaults, an optional TOML file and the environment.
    ///
    /// Later sources win: defaults, then `file` (or `people-sync.toml` in the
    /// working directory when `file` is `None`, if present), then
    /// `PEOPLE_SYNC__SECTION__KEY` environment variables. A `.env` file is
    /// read into the environment first.
    ///
    /// ## Errors
    /// Returns an error if a source cannot be read or the merged values do
    /// not deserialize.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("people-sync").required(false),
        };

        Self::build(
            Self::defaults()?
                .add_source(file_source)
                .add_source(Self::environment()),
        )
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("PEOPLE_SYNC")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("remote.base_url", DEFAULT_BASE_URL)?
            .set_default("remote.collection_path", DEFAULT_COLLECTION_PATH)?
            .set_default("remote.timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("logging.level", "info")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize::<Settings>()
    }
}
