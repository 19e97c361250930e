use std::{
    env,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_NAME: &str = "pawpulse";

/// Locations of pawpulse's files on disk
///
/// Follows the XDG Base Directory layout for configuration and keeps logs
/// under a dot-directory in `$HOME`.
pub struct ConfigPaths;

impl ConfigPaths {
    /// Returns the configuration directory
    ///
    /// `$XDG_CONFIG_HOME/pawpulse`, falling back to `$HOME/.config/pawpulse`.
    ///
    /// # Errors
    /// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is set
    pub fn config_dir() -> Result<PathBuf, Error> {
        Self::config_dir_from(
            env::var("XDG_CONFIG_HOME").ok().as_deref(),
            env::var("HOME").ok().as_deref(),
        )
    }

    /// Resolve the configuration directory from explicit variable values
    ///
    /// An empty `XDG_CONFIG_HOME` counts as unset.
    ///
    /// # Errors
    /// Returns an error if both values are missing
    pub fn config_dir_from(
        xdg_config_home: Option<&str>,
        home: Option<&str>,
    ) -> Result<PathBuf, Error> {
        let base = match (xdg_config_home.filter(|dir| !dir.is_empty()), home) {
            (Some(config_home), _) => PathBuf::from(config_home),
            (None, Some(home)) => PathBuf::from(home).join(".config"),
            (None, None) => {
                return Err(Error::new(
                    ErrorKind::NotFound,
                    "Neither XDG_CONFIG_HOME nor HOME environment variable found",
                ));
            }
        };

        Ok(base.join(APP_NAME))
    }

    /// Returns the path to the main configuration file
    ///
    /// # Errors
    /// As [`config_dir`](Self::config_dir)
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the log directory, creating it if needed
    ///
    /// # Errors
    /// Returns an error if `HOME` is unset or the directory cannot be created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let home = env::var("HOME")
            .map_err(|_| Error::new(ErrorKind::NotFound, "HOME environment variable not found"))?;

        let log_dir = PathBuf::from(home).join(format!(".{APP_NAME}")).join("logs");
        if !log_dir.exists() {
            std::fs::create_dir_all(&log_dir)?;
        }

        Ok(log_dir)
    }
}
