use std::path::Path;

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config_file};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

fn default_session_hours() -> i64 {
    24
}

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    app: App,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Deserialize)]
pub struct App {
    jwt: String,
    database_uri: String,
    #[serde(default)]
    docs: bool,
    /// Lifetime of the `SID` session cookie token.
    #[serde(default = "default_session_hours")]
    session_hours: i64,
}

impl Config {
    pub fn from_toml(bytes: &[u8]) -> ConfigResult<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the config file at `path`. Parse failures name the file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let bytes = read_config_file(path)?;
        Self::from_toml(&bytes).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(&find_config_file(use_local)) {
                    Ok(c) => c,
                    Err(e) => {
                        crate::error::log_error(&e);
                        std::process::exit(1);
                    }
                }
            })
            .await
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    #[inline]
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn session_hours(&self) -> i64 {
        self.session_hours
    }
}
