use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::info::AP_SSID;
use crate::provision::{ArtifactLayout, ProvisioningContext};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Interface the probes inspect and the AP config targets.
    #[serde(default = "default_interface")]
    pub wifi_interface: String,

    /// Directory holding the `etc/...` templates.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Root the rendered files are written under.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Values passed verbatim to the AP templates.
    #[serde(default = "default_access_point")]
    pub access_point: toml::Table,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            wifi_interface: default_interface(),
            assets_dir: default_assets_dir(),
            root_dir: default_root_dir(),
            probe_timeout_secs: default_probe_timeout_secs(),
            access_point: default_access_point(),
        }
    }
}

impl Config {
    /// Loads the config from the default location, or defaults if there is none.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.assets_dir, &self.root_dir)
    }

    /// Template values, with `wifi_interface` filled in from the top-level
    /// setting when the `[access_point]` table doesn't override it.
    pub fn provisioning_context(&self) -> ProvisioningContext {
        let mut values = self.access_point.clone();
        if !values.contains_key("wifi_interface") {
            values.insert(
                "wifi_interface".to_string(),
                toml::Value::String(self.wifi_interface.clone()),
            );
        }
        ProvisioningContext::new(values)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("wifi-mode").join("config.toml"))
}

fn default_interface() -> String {
    "wlan0".to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("/")
}

fn default_probe_timeout_secs() -> u64 {
    10
}

fn default_access_point() -> toml::Table {
    let mut table = toml::Table::new();
    let mut set = |key: &str, value: &str| {
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
    };

    set("ssid", AP_SSID);
    set("passphrase", "raspberry");
    set("domain", "rpi-config.local");
    set("ip_addr", "192.168.44.1");
    set("netmask", "255.255.255.0");
    set("subnet_ip", "192.168.44.0");
    set("broadcast_address", "192.168.44.255");
    set("subnet_range_start", "192.168.44.10");
    set("subnet_range_end", "192.168.44.50");

    table.insert("channel".to_string(), toml::Value::Integer(6));
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.wifi_interface, "wlan0");
        assert_eq!(cfg.probe_timeout(), Duration::from_secs(10));
        assert_eq!(
            cfg.access_point.get("ssid").and_then(|v| v.as_str()),
            Some(AP_SSID)
        );
    }

    #[test]
    fn access_point_table_is_passed_through() {
        let cfg: Config = toml::from_str(
            r#"
wifi_interface = "wlan1"

[access_point]
ssid = "rpi-config-ap"
channel = 11
country_code = "DE"
"#,
        )
        .unwrap();

        let ctx = cfg.provisioning_context();
        assert_eq!(ctx.get_str("country_code"), Some("DE"));
        assert_eq!(ctx.get_str("wifi_interface"), Some("wlan1"));
        assert_eq!(ctx.values().get("channel").and_then(|v| v.as_integer()), Some(11));
        // Not merged with defaults
        assert!(ctx.get_str("passphrase").is_none());
    }

    #[test]
    fn explicit_interface_in_table_wins() {
        let mut cfg = Config::default();
        cfg.access_point
            .insert("wifi_interface".into(), toml::Value::String("uap0".into()));

        assert_eq!(cfg.provisioning_context().get_str("wifi_interface"), Some("uap0"));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.root_dir = PathBuf::from("/tmp/staging");
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.root_dir, PathBuf::from("/tmp/staging"));
        assert_eq!(loaded.access_point, cfg.access_point);
    }
}
