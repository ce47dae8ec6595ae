//! Probe definitions and text scraping.
//!
//! Interface state comes from two net-tools commands whose output is free
//! text. This module owns the commands and the extraction patterns; nothing
//! outside it knows what `ifconfig` or `iwconfig` print.
//!
//! # Probes
//!
//! | Probe             | Command             | Fields                                 |
//! |-------------------|---------------------|----------------------------------------|
//! | `interface-status`| `ifconfig <iface>`  | hardware address, inet address         |
//! | `wireless-status` | `iwconfig <iface>`  | access point address, access point SSID|

use lazy_static::lazy_static;
use regex::Regex;

use crate::info::InterfaceInfo;

lazy_static! {
    // Old net-tools print "HWaddr", newer releases print "ether"
    static ref HW_ADDR: Regex =
        Regex::new(r"(?:HWaddr|ether)\s+([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})").unwrap();
    // "inet addr:1.2.3.4" or "inet 1.2.3.4"; the trailing space keeps inet6 out
    static ref INET_ADDR: Regex =
        Regex::new(r"inet (?:addr:)?(\d{1,3}(?:\.\d{1,3}){3})").unwrap();
    static ref AP_ADDR: Regex =
        Regex::new(r"Access Point:\s+([0-9A-Fa-f]{2}(?::[0-9A-Fa-f]{2}){5})").unwrap();
    static ref ESSID: Regex = Regex::new(r#"ESSID:"([^"]+)""#).unwrap();
}

/// A field of [`InterfaceInfo`] that a probe pattern fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    HardwareAddress,
    InetAddress,
    AccessPointAddress,
    AccessPointSsid,
}

impl Field {
    fn pattern(self) -> &'static Regex {
        match self {
            Field::HardwareAddress => &*HW_ADDR,
            Field::InetAddress => &*INET_ADDR,
            Field::AccessPointAddress => &*AP_ADDR,
            Field::AccessPointSsid => &*ESSID,
        }
    }

    fn slot(self, info: &mut InterfaceInfo) -> &mut Option<String> {
        match self {
            Field::HardwareAddress => &mut info.hardware_address,
            Field::InetAddress => &mut info.inet_address,
            Field::AccessPointAddress => &mut info.access_point_address,
            Field::AccessPointSsid => &mut info.access_point_ssid,
        }
    }
}

/// A status command and the fields it is scanned for.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub name: &'static str,
    pub program: &'static str,
    pub fields: &'static [Field],
}

pub const INTERFACE_STATUS: Probe = Probe {
    name: "interface-status",
    program: "ifconfig",
    fields: &[Field::HardwareAddress, Field::InetAddress],
};

pub const WIRELESS_STATUS: Probe = Probe {
    name: "wireless-status",
    program: "iwconfig",
    fields: &[Field::AccessPointAddress, Field::AccessPointSsid],
};

/// Probes in the order they must run.
pub const PROBES: [Probe; 2] = [INTERFACE_STATUS, WIRELESS_STATUS];

impl Probe {
    /// Scans `output` and overwrites every field whose pattern matches.
    /// Fields that don't match are left as they were.
    pub fn apply(&self, output: &str, info: &mut InterfaceInfo) {
        for field in self.fields {
            if let Some(value) = field
                .pattern()
                .captures(output)
                .and_then(|caps| caps.get(1))
            {
                *field.slot(info) = Some(value.as_str().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IFCONFIG_LEGACY: &str = "\
wlan0     Link encap:Ethernet  HWaddr b8:27:eb:12:34:56
          inet addr:192.168.1.5  Bcast:192.168.1.255  Mask:255.255.255.0
          UP BROADCAST RUNNING MULTICAST  MTU:1500  Metric:1
";

    const IFCONFIG_MODERN: &str = "\
wlan0: flags=4163<UP,BROADCAST,RUNNING,MULTICAST>  mtu 1500
        inet6 fe80::ba27:ebff:fe12:3456  prefixlen 64  scopeid 0x20<link>
        inet 10.0.0.7  netmask 255.255.255.0  broadcast 10.0.0.255
        ether B8:27:EB:12:34:56  txqueuelen 1000  (Ethernet)
";

    const IWCONFIG_AP: &str = "\
wlan0     IEEE 802.11  ESSID:\"rpi-config-ap\"
          Mode:Master  Frequency:2.437 GHz  Access Point: B8:27:EB:12:34:56
";

    const IWCONFIG_UNASSOCIATED: &str = "\
wlan0     IEEE 802.11  ESSID:off/any
          Mode:Managed  Access Point: Not-Associated   Tx-Power=31 dBm
";

    #[test]
    fn parses_legacy_ifconfig() {
        let mut info = InterfaceInfo::default();
        INTERFACE_STATUS.apply(IFCONFIG_LEGACY, &mut info);
        assert_eq!(info.hardware_address.as_deref(), Some("b8:27:eb:12:34:56"));
        assert_eq!(info.inet_address.as_deref(), Some("192.168.1.5"));
    }

    #[test]
    fn parses_modern_ifconfig_and_skips_inet6() {
        let mut info = InterfaceInfo::default();
        INTERFACE_STATUS.apply(IFCONFIG_MODERN, &mut info);
        assert_eq!(info.hardware_address.as_deref(), Some("B8:27:EB:12:34:56"));
        assert_eq!(info.inet_address.as_deref(), Some("10.0.0.7"));
    }

    #[test]
    fn parses_iwconfig_in_master_mode() {
        let mut info = InterfaceInfo::default();
        WIRELESS_STATUS.apply(IWCONFIG_AP, &mut info);
        assert_eq!(info.access_point_address.as_deref(), Some("B8:27:EB:12:34:56"));
        assert_eq!(info.access_point_ssid.as_deref(), Some("rpi-config-ap"));
    }

    #[test]
    fn unassociated_leaves_fields_absent() {
        let mut info = InterfaceInfo::default();
        WIRELESS_STATUS.apply(IWCONFIG_UNASSOCIATED, &mut info);
        assert_eq!(info.access_point_address, None);
        assert_eq!(info.access_point_ssid, None);
    }

    #[test]
    fn empty_output_changes_nothing() {
        let mut info = InterfaceInfo::default();
        for probe in PROBES {
            probe.apply("", &mut info);
        }
        assert_eq!(info, InterfaceInfo::default());
    }

    #[test]
    fn probe_only_touches_its_own_fields() {
        let mut info = InterfaceInfo::default();
        WIRELESS_STATUS.apply(IFCONFIG_LEGACY, &mut info);
        assert_eq!(info, InterfaceInfo::default());
    }
}
