use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_WHOIS_API_URL: &str = "https://www.whoisxmlapi.com/whoisserver/WhoisService";

#[derive(Error, Debug)]
pub enum PrefError {
    #[error("unable to access config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("unable to write default config: {0}")]
    TomlWriteError(#[from] toml::ser::Error),
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Preferences {
    http_ip: String,
    port: u16,
    whois_api_url: String,
    whois_api_key: String,
    log_level: String,
    https_cert_path: Option<String>,
    https_key_path: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            http_ip: String::from("127.0.0.1"),
            port: 5000,
            whois_api_url: String::from(DEFAULT_WHOIS_API_URL),
            whois_api_key: String::new(),
            log_level: String::from("info"),
            https_cert_path: None,
            https_key_path: None,
        }
    }
}

impl Preferences {
    pub fn http_ip(&self) -> &str {
        self.http_ip.as_str()
    }
    pub fn port(&self) -> u16 {
        self.port
    }
    pub fn whois_api_url(&self) -> &str {
        self.whois_api_url.as_str()
    }
    pub fn whois_api_key(&self) -> &str {
        self.whois_api_key.as_str()
    }
    pub fn https_cert_path(&self) -> &Option<String> {
        &self.https_cert_path
    }
    pub fn https_key_path(&self) -> &Option<String> {
        &self.https_key_path
    }

    /// Unknown level names fall back to INFO.
    pub fn log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    /// Reads the TOML config at `path`, writing a default one first if nothing is there yet.
    pub fn load_config(path: impl AsRef<Path>) -> Result<Self, PrefError> {
        let path = path.as_ref();
        eprintln!("Config path is {}", path.display());
        let file_buff = match fs::read_to_string(path) {
            Ok(buff) => buff,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return create_default_config(path)
            }
            Err(err) => return Err(PrefError::IoError(err)),
        };
        Ok(toml::from_str(&file_buff)?)
    }

    /// Loads the config file and applies the `WHOIS_API_KEY` and `PORT` environment overrides.
    pub fn from_env() -> Result<Self, PrefError> {
        let path = std::env::var("WHOIS_LOOKUP_CONFIG")
            .unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH));
        let mut prefs = Self::load_config(path)?;
        prefs.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(prefs)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), PrefError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("WHOIS_API_KEY") {
            self.whois_api_key = key;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| PrefError::InvalidPort(port.clone()))?;
        }
        Ok(())
    }
}

fn create_default_config(path: &Path) -> Result<Preferences, PrefError> {
    let new_pref = Preferences::default();
    eprintln!(
        "No config found, writing defaults to {}. Set whois_api_key or WHOIS_API_KEY before searching.",
        path.display()
    );
    fs::write(path, toml::to_string(&new_pref)?)?;
    Ok(new_pref)
}
