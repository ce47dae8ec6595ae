//! WiFi mode detection and access-point provisioning.
//!
//! This library answers one question about a wireless interface (is it a
//! client on someone else's network, broadcasting its own access point, or
//! neither?) and can switch it into access-point mode by writing the
//! `interfaces`, `dhcpd`, `isc-dhcp-server` and `hostapd` config files.
//!
//! # Modules
//!
//! - [`command`] - External command execution with timeouts
//! - [`config`] - TOML configuration for the interface, paths and AP settings
//! - [`detector`] - Runs the status probes and classifies the interface mode
//! - [`error`] - Custom error types for the library
//! - [`files`] - Filesystem access used when writing artifacts
//! - [`info`] - Interface snapshot and the classification rules
//! - [`probe`] - Probe commands and output parsing
//! - [`provision`] - Writes the access-point config artifacts
//! - [`template`] - Template rendering
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_mode::{ApProvisioner, Config, LocalFs, ModeDetector, SystemRunner};
//!
//! let cfg = Config::load().expect("bad config");
//! let detector = ModeDetector::new(SystemRunner::new(cfg.probe_timeout()), &cfg.wifi_interface);
//!
//! if detector.is_access_point_enabled().expect("probe failed").is_none() {
//!     let provisioner = ApProvisioner::new(&detector, LocalFs, cfg.layout());
//!     provisioner
//!         .enable_access_point(&cfg.provisioning_context())
//!         .expect("provisioning failed");
//! }
//! ```

/// Command module wrapping process execution behind the `CommandRunner` trait.
pub mod command;

/// Configuration module for reading/writing the TOML config file.
pub mod config;

/// Detector module combining probe output into a mode classification.
pub mod detector;

/// Error module defining custom error types for the library.
/// Uses `thiserror` for ergonomic error handling.
pub mod error;

/// Files module abstracting template reads and artifact writes.
pub mod files;

/// Info module with the interface snapshot and `classify`.
pub mod info;

/// Probe module holding the status commands and their extraction patterns.
pub mod probe;

/// Provision module that writes the access-point config artifacts in order.
pub mod provision;

/// Template module rendering artifact templates with Tera.
pub mod template;

pub use command::{CommandOutput, CommandRunner, SystemRunner};
pub use config::Config;
pub use detector::ModeDetector;
pub use error::{CommandError, Result, WifiModeError};
pub use files::{FileSystem, LocalFs};
pub use info::{classify, InterfaceInfo, ModeClassification, AP_SSID};
pub use provision::{ApProvisioner, ArtifactLayout, ConfigArtifact, ProvisioningContext};
