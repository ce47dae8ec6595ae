//! Interface state snapshot and mode classification.
//!
//! [`classify`] is the single place that decides whether an interface is
//! acting as an access point, a connected client, or neither. Everything that
//! answers "is the AP up?" or "are we on wifi?" goes through it.

use std::fmt;

use serde::Serialize;

/// SSID broadcast by this device when it runs its own access point.
pub const AP_SSID: &str = "rpi-config-ap";

/// Fields scraped from the interface probes.
///
/// `None` means the field was not observed in probe output, which is distinct
/// from an observed empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    /// MAC address of the local interface.
    pub hardware_address: Option<String>,

    /// IPv4 address assigned to the interface.
    pub inet_address: Option<String>,

    /// MAC address of the access point the interface is associated with.
    /// When the interface is itself the AP this equals `hardware_address`.
    pub access_point_address: Option<String>,

    /// SSID of the associated (or broadcast) network.
    pub access_point_ssid: Option<String>,
}

/// Operating mode derived from an [`InterfaceInfo`] snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "address", rename_all = "snake_case")]
pub enum ModeClassification {
    /// Associated to an upstream network; carries the inet address.
    ClientConnected(String),
    /// Broadcasting our own network; carries the lower-cased hardware address.
    AccessPointEnabled(String),
    Disabled,
}

impl ModeClassification {
    pub fn client_address(&self) -> Option<&str> {
        match self {
            ModeClassification::ClientConnected(addr) => Some(addr.as_str()),
            _ => None,
        }
    }

    pub fn access_point_address(&self) -> Option<&str> {
        match self {
            ModeClassification::AccessPointEnabled(addr) => Some(addr.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ModeClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeClassification::ClientConnected(addr) => write!(f, "client connected ({})", addr),
            ModeClassification::AccessPointEnabled(addr) => {
                write!(f, "access point enabled ({})", addr)
            }
            ModeClassification::Disabled => write!(f, "disabled"),
        }
    }
}

/// Classifies a snapshot. Pure, no I/O.
///
/// Access-point mode wins over client mode: an AP also has an inet address.
pub fn classify(info: &InterfaceInfo) -> ModeClassification {
    if let Some(addr) = access_point_address(info) {
        return ModeClassification::AccessPointEnabled(addr);
    }

    match &info.inet_address {
        Some(inet) => ModeClassification::ClientConnected(inet.clone()),
        None => ModeClassification::Disabled,
    }
}

fn access_point_address(info: &InterfaceInfo) -> Option<String> {
    let hw = info.hardware_address.as_deref()?.to_lowercase();
    let ap = info.access_point_address.as_deref()?.to_lowercase();
    let ssid = info.access_point_ssid.as_deref()?;

    (hw == ap && ssid == AP_SSID).then_some(hw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(hw: Option<&str>, inet: Option<&str>, ap: Option<&str>, ssid: Option<&str>) -> InterfaceInfo {
        InterfaceInfo {
            hardware_address: hw.map(String::from),
            inet_address: inet.map(String::from),
            access_point_address: ap.map(String::from),
            access_point_ssid: ssid.map(String::from),
        }
    }

    #[test]
    fn access_point_matches_case_insensitively() {
        let snapshot = info(
            Some("AA:BB:CC:DD:EE:FF"),
            Some("192.168.1.5"),
            Some("aa:bb:cc:dd:ee:ff"),
            Some("rpi-config-ap"),
        );
        assert_eq!(
            classify(&snapshot),
            ModeClassification::AccessPointEnabled("aa:bb:cc:dd:ee:ff".to_string())
        );
    }

    #[test]
    fn access_point_ignores_inet_address() {
        let snapshot = info(
            Some("aa:bb:cc:dd:ee:ff"),
            None,
            Some("AA:BB:CC:DD:EE:FF"),
            Some(AP_SSID),
        );
        assert_eq!(
            classify(&snapshot),
            ModeClassification::AccessPointEnabled("aa:bb:cc:dd:ee:ff".to_string())
        );
    }

    #[test]
    fn client_when_inet_present_and_not_ap() {
        let snapshot = info(Some("AA:BB:CC:DD:EE:FF"), Some("10.0.0.7"), None, None);
        assert_eq!(
            classify(&snapshot),
            ModeClassification::ClientConnected("10.0.0.7".to_string())
        );
    }

    #[test]
    fn ssid_match_is_case_sensitive() {
        let snapshot = info(
            Some("aa:bb:cc:dd:ee:ff"),
            Some("192.168.44.1"),
            Some("aa:bb:cc:dd:ee:ff"),
            Some("RPI-CONFIG-AP"),
        );
        assert_eq!(
            classify(&snapshot),
            ModeClassification::ClientConnected("192.168.44.1".to_string())
        );
    }

    #[test]
    fn associated_to_other_ap_is_client() {
        let snapshot = info(
            Some("aa:bb:cc:dd:ee:ff"),
            Some("10.0.0.7"),
            Some("11:22:33:44:55:66"),
            Some(AP_SSID),
        );
        assert_eq!(
            classify(&snapshot),
            ModeClassification::ClientConnected("10.0.0.7".to_string())
        );
    }

    #[test]
    fn empty_snapshot_is_disabled() {
        assert_eq!(classify(&InterfaceInfo::default()), ModeClassification::Disabled);
    }

    #[test]
    fn missing_hardware_address_never_matches_ap() {
        let snapshot = info(None, None, None, Some(AP_SSID));
        assert_eq!(classify(&snapshot), ModeClassification::Disabled);
    }

    #[test]
    fn projections_follow_variant() {
        let ap = ModeClassification::AccessPointEnabled("aa".into());
        assert_eq!(ap.access_point_address(), Some("aa"));
        assert_eq!(ap.client_address(), None);

        let client = ModeClassification::ClientConnected("10.0.0.7".into());
        assert_eq!(client.client_address(), Some("10.0.0.7"));
        assert_eq!(client.access_point_address(), None);

        assert_eq!(ModeClassification::Disabled.client_address(), None);
    }

    #[test]
    fn serializes_with_mode_tag() {
        let json = serde_json::to_value(ModeClassification::ClientConnected("10.0.0.7".into())).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "client_connected", "address": "10.0.0.7"}));
    }
}
