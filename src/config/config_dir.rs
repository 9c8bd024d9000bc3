use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

pub fn find_config_file(use_local: bool) -> PathBuf {
    let app_name = crate::APPLICATION_NAME;

    if use_local {
        return PathBuf::from("./config.toml");
    }

    #[cfg(unix)]
    let path = std::env::var_os("HOME");
    #[cfg(windows)]
    let path = std::env::var_os("APPDATA");

    #[cfg(any(unix, windows))]
    if let Some(app_path) = path {
        let mut path = PathBuf::from(app_path);

        if cfg!(unix) {
            path = path.join(".config");
        }

        path = path.join(app_name).join("config.toml");

        if path.exists() {
            return path;
        }
    }

    PathBuf::from("./config.toml")
}

pub fn read_config_file(filename: &Path) -> ConfigResult<Vec<u8>> {
    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(ConfigError::ConfigNotFound(filename.to_path_buf()));
    }

    let filename = filename.canonicalize()?;
    debug!("using {} as configuration file", filename.display());

    let mut fd = File::open(filename)?;
    let mut buf = Vec::new();
    fd.read_to_end(&mut buf)?;

    Ok(buf)
}
