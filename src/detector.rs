//! Mode detection for the managed wifi interface.
//!
//! [`ModeDetector`] runs the status probes in order, folds their output into an
//! [`InterfaceInfo`] and hands it to [`classify`]. The convenience checks
//! ([`ModeDetector::is_client_connected`], [`ModeDetector::is_access_point_enabled`])
//! are projections of that one classification.
//!
//! # Example
//!
//! ```no_run
//! use wifi_mode::{command::SystemRunner, ModeDetector};
//!
//! let detector = ModeDetector::new(SystemRunner::default(), "wlan0");
//! if let Some(addr) = detector.is_access_point_enabled().expect("probe failed") {
//!     println!("AP is up on {}", addr);
//! }
//! ```

use std::sync::Mutex;

use tracing::{debug, info};

use crate::command::CommandRunner;
use crate::error::{CommandError, Result, WifiModeError};
use crate::info::{classify, InterfaceInfo, ModeClassification};
use crate::probe::{Probe, PROBES};

pub struct ModeDetector<R> {
    runner: R,
    interface: String,
    /// Snapshot from the last successful detection. Diagnostic only, never
    /// read back for a classification.
    last_info: Mutex<Option<InterfaceInfo>>,
}

impl<R: CommandRunner> ModeDetector<R> {
    pub fn new(runner: R, interface: impl Into<String>) -> Self {
        Self {
            runner,
            interface: interface.into(),
            last_info: Mutex::new(None),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Runs every probe in order and returns a fresh snapshot.
    ///
    /// Stops at the first probe that fails to run or exits non-zero; later
    /// probes are not started and the last-known snapshot is left untouched.
    pub fn get_info(&self) -> Result<InterfaceInfo> {
        let mut info = InterfaceInfo::default();

        for probe in &PROBES {
            let stdout = self.run_probe(probe)?;
            probe.apply(&stdout, &mut info);
        }

        debug!(interface = %self.interface, ?info, "interface info collected");
        *self.last_info.lock().unwrap_or_else(|e| e.into_inner()) = Some(info.clone());

        Ok(info)
    }

    /// Detects and classifies the current mode.
    pub fn mode(&self) -> Result<ModeClassification> {
        let mode = classify(&self.get_info()?);
        info!(interface = %self.interface, %mode, "wifi mode detected");
        Ok(mode)
    }

    /// Returns the inet address when connected to an upstream network as a client.
    pub fn is_client_connected(&self) -> Result<Option<String>> {
        Ok(self.mode()?.client_address().map(String::from))
    }

    /// Returns the (lower-cased) hardware address when broadcasting our own AP.
    pub fn is_access_point_enabled(&self) -> Result<Option<String>> {
        Ok(self.mode()?.access_point_address().map(String::from))
    }

    /// Last successfully collected snapshot, if any.
    pub fn last_info(&self) -> Option<InterfaceInfo> {
        self.last_info
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn run_probe(&self, probe: &Probe) -> Result<String> {
        debug!(probe = probe.name, program = probe.program, "running probe");

        let wrap = |source: CommandError| WifiModeError::Probe {
            probe: probe.name.to_string(),
            source,
        };

        let output = self
            .runner
            .run(probe.program, &[self.interface.as_str()])
            .map_err(wrap)?;

        if !output.success() {
            return Err(wrap(CommandError::Failed {
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            }));
        }

        Ok(output.stdout)
    }
}
