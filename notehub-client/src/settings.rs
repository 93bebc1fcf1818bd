use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File as ConfigFile, FileFormat};
use eyre::{eyre, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

const EXAMPLE_CONFIG: &str = include_str!("../config.toml");
const CONFIG_FILENAME: &str = "config.toml";

/// Namespace of the persisted session entry.
pub const SESSION_NAMESPACE: &str = "auth-storage";

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub server_address: String,
    pub session_path: String,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn config_dir() -> PathBuf {
        std::env::var("NOTEHUB_CONFIG_DIR")
            .map_or_else(|_| notehub_common::utils::config_dir(), PathBuf::from)
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(CONFIG_FILENAME)
    }

    /// Defaults only. Tests start from here and layer their own values on top.
    pub fn build_default() -> Result<ConfigBuilder<DefaultState>> {
        let data_dir = notehub_common::utils::data_dir();
        let session_path = data_dir.join(format!("{SESSION_NAMESPACE}.json"));

        Ok(Config::builder()
            .set_default("server_address", "http://localhost:8000")?
            .set_default("session_path", session_path.to_string_lossy().to_string())?
            .set_default("timeout_secs", 30)?)
    }

    pub fn environment() -> Environment {
        Environment::with_prefix("notehub")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self> {
        let config_dir = Self::config_dir();
        let data_dir = notehub_common::utils::data_dir();

        create_dir_all(&config_dir)
            .wrap_err_with(|| format!("Failed to create dir {config_dir:?}"))?;
        create_dir_all(&data_dir).wrap_err_with(|| format!("Failed to create dir {data_dir:?}"))?;

        let config_file = config_dir.join(CONFIG_FILENAME);

        // The file is layered below the environment so NOTEHUB_* always wins.
        let mut config_builder = Self::build_default()?;
        config_builder = if config_file.exists() {
            config_builder.add_source(ConfigFile::new(
                &config_file.to_string_lossy(),
                FileFormat::Toml,
            ))
        } else {
            let mut file = File::create(&config_file).wrap_err("Failed to create config file")?;
            file.write_all(EXAMPLE_CONFIG.as_bytes())
                .wrap_err("Failed to write default config file")?;
            config_builder
        };

        let mut settings: Settings = config_builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {}", e))?;

        settings.server_address = settings.server_address.trim_end_matches('/').to_string();
        settings.session_path = expand_shell(&settings.session_path)?;

        Ok(settings)
    }
}

fn expand_shell(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_local_backend() {
        let settings: Settings = Settings::build_default()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server_address, "http://localhost:8000");
        assert!(settings.session_path.ends_with("auth-storage.json"));
        assert_eq!(settings.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = HashMap::from([
            (
                "NOTEHUB_SERVER_ADDRESS".to_string(),
                "https://notes.example.com".to_string(),
            ),
            ("NOTEHUB_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);

        let settings: Settings = Settings::build_default()
            .unwrap()
            .add_source(Settings::environment().source(Some(env)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server_address, "https://notes.example.com");
        assert_eq!(settings.timeout_secs, 5);
    }
}
