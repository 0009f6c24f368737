//! Debian-interfaces-style configuration parsing
//!
//! A small line-oriented parser for the `/etc/network/interfaces` syntax
//! used by cloud images to describe static adapter configuration. Parsing
//! produces an [`InterfacesFile`] of stanzas; binding the stanzas to typed
//! adapter configuration is a separate step, so a recognized file with an
//! incomplete stanza still binds to nothing.
//!
//! Only the subset emitted by provisioning layers is understood: `iface`
//! headers, single-value options (address, netmask, broadcast, gateway),
//! and rest-of-line options (dns-nameservers, up/down commands).

use super::{AdapterConfig, StaticRoute};

/// Option keywords whose value runs to the end of the line
const REST_OF_LINE_KEYS: &[&str] = &[
    "dns-nameservers",
    "dns-search",
    "up",
    "down",
    "pre-up",
    "post-up",
    "pre-down",
    "post-down",
];

/// Top-level directives that end a stanza body
const TOP_LEVEL_KEYS: &[&str] = &["auto", "allow-auto", "allow-hotplug", "source", "mapping"];

/// A parsed interfaces document
#[derive(Debug, Clone, Default)]
pub struct InterfacesFile {
    stanzas: Vec<Stanza>,
}

/// One `iface` stanza
#[derive(Debug, Clone)]
pub struct Stanza {
    pub name: String,
    pub family: String,
    pub method: String,
    options: Vec<StanzaOption>,
}

/// A single option inside a stanza
#[derive(Debug, Clone)]
struct StanzaOption {
    name: String,
    values: Vec<String>,
}

impl InterfacesFile {
    /// Parse the whole document
    ///
    /// Unknown directives and malformed lines are skipped rather than
    /// rejected; completeness is checked when binding.
    pub fn parse(text: &str) -> Self {
        let mut stanzas: Vec<Stanza> = Vec::new();
        let mut current: Option<Stanza> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();

            if tokens[0] == "iface" {
                if let Some(stanza) = current.take() {
                    stanzas.push(stanza);
                }
                if tokens.len() >= 4 {
                    current = Some(Stanza {
                        name: tokens[1].to_string(),
                        family: tokens[2].to_string(),
                        method: tokens[3].to_string(),
                        options: Vec::new(),
                    });
                }
                continue;
            }

            if TOP_LEVEL_KEYS.contains(&tokens[0]) {
                if let Some(stanza) = current.take() {
                    stanzas.push(stanza);
                }
                continue;
            }

            if let Some(stanza) = current.as_mut() {
                stanza.push_option_line(&tokens);
            }
        }

        if let Some(stanza) = current.take() {
            stanzas.push(stanza);
        }

        Self { stanzas }
    }

    /// First stanza declared for the given interface name
    pub fn stanza(&self, name: &str) -> Option<&Stanza> {
        self.stanzas.iter().find(|s| s.name == name)
    }

    /// All parsed stanzas, in document order
    pub fn stanzas(&self) -> &[Stanza] {
        &self.stanzas
    }

    /// Bind a full static stanza: address, netmask, broadcast, gateway and
    /// a non-empty dns-nameservers list are all required
    pub fn bind_adapter(&self, name: &str) -> Option<AdapterConfig> {
        let stanza = self.stanza(name)?;
        if !stanza.is_static() {
            return None;
        }

        let dns_servers = stanza.values("dns-nameservers")?.to_vec();
        if dns_servers.is_empty() {
            return None;
        }

        Some(AdapterConfig {
            address: stanza.value("address")?.to_string(),
            netmask: stanza.value("netmask")?.to_string(),
            broadcast: stanza.value("broadcast")?.to_string(),
            gateway: stanza.value("gateway")?.to_string(),
            dns_servers,
        })
    }

    /// Bind a static stanza that carries a route clause instead of its own
    /// gateway and DNS entries
    pub fn bind_routed_adapter(&self, name: &str) -> Option<RoutedAdapter> {
        let stanza = self.stanza(name)?;
        if !stanza.is_static() {
            return None;
        }

        Some(RoutedAdapter {
            address: stanza.value("address")?.to_string(),
            netmask: stanza.value("netmask")?.to_string(),
            broadcast: stanza.value("broadcast")?.to_string(),
            route: stanza.static_route()?,
        })
    }
}

/// Binding of a stanza whose only gateway information is a route clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedAdapter {
    pub address: String,
    pub netmask: String,
    pub broadcast: String,
    pub route: StaticRoute,
}

impl Stanza {
    fn push_option_line(&mut self, tokens: &[&str]) {
        let mut i = 0;
        while i < tokens.len() {
            let key = tokens[i];
            if REST_OF_LINE_KEYS.contains(&key) {
                self.options.push(StanzaOption {
                    name: key.to_string(),
                    values: tokens[i + 1..].iter().map(|t| t.to_string()).collect(),
                });
                break;
            }

            // Single-value option; several may share one line
            let values = match tokens.get(i + 1) {
                Some(value) => vec![value.to_string()],
                None => Vec::new(),
            };
            self.options.push(StanzaOption {
                name: key.to_string(),
                values,
            });
            i += 2;
        }
    }

    /// Whether this stanza declares `inet static`
    pub fn is_static(&self) -> bool {
        self.family == "inet" && self.method == "static"
    }

    /// First value of the first occurrence of an option
    pub fn value(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.values.first())
            .map(String::as_str)
    }

    /// All values of the first occurrence of an option
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.values.as_slice())
    }

    /// First `up route add -net <dest> netmask <mask> gw <gw>` clause
    pub fn static_route(&self) -> Option<StaticRoute> {
        self.options
            .iter()
            .filter(|o| o.name == "up")
            .find_map(|o| {
                let v = &o.values;
                if v.len() >= 8
                    && v[0] == "route"
                    && v[1] == "add"
                    && v[2] == "-net"
                    && v[4] == "netmask"
                    && v[6] == "gw"
                {
                    Some(StaticRoute {
                        destination: v[3].clone(),
                        netmask: v[5].clone(),
                        gateway: v[7].clone(),
                    })
                } else {
                    None
                }
            })
    }
}
