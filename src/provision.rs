//! Access-point provisioning.
//!
//! Switching to access-point mode means rewriting four system config files
//! from templates. The files depend on each other once the network stack is
//! restarted, so they are always written in the same order:
//!
//! 1. `/etc/network/interfaces` - static address on the wifi interface
//! 2. `/etc/dhcp/dhcpd.conf` - subnet and authoritative DHCP for the AP pool
//! 3. `/etc/default/isc-dhcp-server` - interface the DHCP daemon listens on
//! 4. `/etc/hostapd/hostapd.conf` - SSID, channel and security for hostapd
//!
//! Nothing here restarts services; the files take effect on the next
//! networking restart or reboot.
//!
//! The sequence stops at the first artifact that fails. Files already written
//! stay in place, and rerunning the whole sequence is always safe.

use std::fmt;
use std::path::PathBuf;

use tracing::info;

use crate::command::CommandRunner;
use crate::detector::ModeDetector;
use crate::error::{Result, WifiModeError};
use crate::files::FileSystem;
use crate::template;

/// One of the config files written to enable access-point mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigArtifact {
    Interfaces,
    Dhcpd,
    DhcpServerDefaults,
    Hostapd,
}

impl ConfigArtifact {
    /// Every artifact, in the order it must be written.
    pub const ALL: [ConfigArtifact; 4] = [
        ConfigArtifact::Interfaces,
        ConfigArtifact::Dhcpd,
        ConfigArtifact::DhcpServerDefaults,
        ConfigArtifact::Hostapd,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigArtifact::Interfaces => "interfaces",
            ConfigArtifact::Dhcpd => "dhcpd",
            ConfigArtifact::DhcpServerDefaults => "isc-dhcp-server",
            ConfigArtifact::Hostapd => "hostapd",
        }
    }

    /// Template location, relative to the assets directory.
    pub fn template(self) -> &'static str {
        match self {
            ConfigArtifact::Interfaces => "etc/network/interfaces.ap.template",
            ConfigArtifact::Dhcpd => "etc/dhcp/dhcpd.conf.template",
            ConfigArtifact::DhcpServerDefaults => "etc/default/isc-dhcp-server.template",
            ConfigArtifact::Hostapd => "etc/hostapd/hostapd.conf.template",
        }
    }

    /// Destination, relative to the system root.
    pub fn destination(self) -> &'static str {
        match self {
            ConfigArtifact::Interfaces => "etc/network/interfaces",
            ConfigArtifact::Dhcpd => "etc/dhcp/dhcpd.conf",
            ConfigArtifact::DhcpServerDefaults => "etc/default/isc-dhcp-server",
            ConfigArtifact::Hostapd => "etc/hostapd/hostapd.conf",
        }
    }
}

impl fmt::Display for ConfigArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where templates are read from and where rendered files go.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub assets_dir: PathBuf,
    pub root_dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new(assets_dir: impl Into<PathBuf>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            root_dir: root_dir.into(),
        }
    }

    pub fn template_path(&self, artifact: ConfigArtifact) -> PathBuf {
        self.assets_dir.join(artifact.template())
    }

    pub fn destination_path(&self, artifact: ConfigArtifact) -> PathBuf {
        self.root_dir.join(artifact.destination())
    }
}

/// Access-point settings passed through to every template.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningContext {
    values: toml::Table,
}

impl ProvisioningContext {
    pub fn new(values: toml::Table) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &toml::Table {
        &self.values
    }

    /// Convenience lookup for string settings such as `ssid`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Template context: the settings plus `enable_ap = true`.
    pub fn render_context(&self) -> Result<tera::Context> {
        let mut context = tera::Context::from_serialize(&self.values)
            .map_err(|e| WifiModeError::Config(e.to_string()))?;
        context.insert("enable_ap", &true);
        Ok(context)
    }
}

pub struct ApProvisioner<'d, R, F> {
    detector: &'d ModeDetector<R>,
    fs: F,
    layout: ArtifactLayout,
}

impl<'d, R: CommandRunner, F: FileSystem> ApProvisioner<'d, R, F> {
    pub fn new(detector: &'d ModeDetector<R>, fs: F, layout: ArtifactLayout) -> Self {
        Self {
            detector,
            fs,
            layout,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Writes all access-point artifacts in order.
    ///
    /// Already being in AP mode is not a reason to skip: templates may have
    /// changed, so every artifact is rewritten.
    pub fn enable_access_point(&self, context: &ProvisioningContext) -> Result<()> {
        if let Some(addr) = self.detector.is_access_point_enabled()? {
            info!(%addr, "access point is already enabled, rewriting config");
        }

        let render_context = context.render_context()?;

        for artifact in ConfigArtifact::ALL {
            self.write_artifact(artifact, &render_context)?;
        }

        info!(
            root = %self.layout.root_dir.display(),
            "access point config written; restart networking to apply"
        );
        Ok(())
    }

    /// Reverting to client mode is not implemented.
    pub fn disable_access_point(&self) -> Result<()> {
        Err(WifiModeError::NotSupported(
            "disabling access point mode".to_string(),
        ))
    }

    fn write_artifact(&self, artifact: ConfigArtifact, context: &tera::Context) -> Result<()> {
        let template_path = self.layout.template_path(artifact);
        let template = self
            .fs
            .read_to_string(&template_path)
            .map_err(|source| WifiModeError::TemplateRead {
                artifact,
                path: template_path.clone(),
                source,
            })?;

        let rendered = template::render(&template, context)
            .map_err(|source| WifiModeError::TemplateRender { artifact, source })?;

        let destination = self.layout.destination_path(artifact);
        self.fs
            .write(&destination, &rendered)
            .map_err(|source| WifiModeError::FileWrite {
                artifact,
                path: destination.clone(),
                source,
            })?;

        info!(%artifact, path = %destination.display(), "wrote artifact");
        Ok(())
    }
}
