//! Network configuration types
//!
//! Plain data carried from the parsed interfaces text to the OS layer.
//! Field values are passed through verbatim; no IP syntax validation is
//! performed here.

pub mod interfaces;

use serde::{Deserialize, Serialize};

/// Static configuration for one network adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub address: String,
    pub netmask: String,
    pub broadcast: String,
    pub gateway: String,
    /// DNS servers in document order
    #[serde(default)]
    pub dns_servers: Vec<String>,
}

/// A static route attached to an adapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub destination: String,
    pub netmask: String,
    pub gateway: String,
}

/// Convert a dotted-decimal netmask to a CIDR prefix length
pub fn netmask_to_prefix(netmask: &str) -> u8 {
    // Handle CIDR notation directly
    if let Ok(prefix) = netmask.parse::<u8>() {
        return prefix;
    }

    let octets: Vec<u8> = netmask.split('.').filter_map(|s| s.parse().ok()).collect();

    if octets.len() != 4 {
        return 24; // Default to /24
    }

    let mut prefix = 0u8;
    for octet in octets {
        prefix += octet.count_ones() as u8;
    }
    prefix
}

/// Convert a CIDR prefix length to a dotted-decimal netmask
pub fn prefix_to_netmask(prefix: u8) -> String {
    let mask: u32 = if prefix >= 32 {
        0xffffffff
    } else {
        0xffffffff << (32 - prefix)
    };
    format!(
        "{}.{}.{}.{}",
        (mask >> 24) & 0xff,
        (mask >> 16) & 0xff,
        (mask >> 8) & 0xff,
        mask & 0xff
    )
}
