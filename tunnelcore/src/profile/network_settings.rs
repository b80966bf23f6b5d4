use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Whether a network setting comes from the VPN server or from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkChoice {
    /// Use what the server pushes.
    #[default]
    Automatic,
    /// Use the manual override values.
    Manual,
}

/// DNS transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsProtocol {
    /// Cleartext DNS.
    #[default]
    Plain,
    /// DNS over HTTPS.
    Https,
    /// DNS over TLS.
    Tls,
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "https" => Ok(Self::Https),
            "tls" => Ok(Self::Tls),
            other => Err(format!("unknown DNS protocol: {other}")),
        }
    }
}

/// Default gateway override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettings {
    /// Source of the setting.
    pub choice: NetworkChoice,
    /// Route all IPv4 traffic through the tunnel.
    #[serde(rename = "isDefaultIPv4")]
    pub is_default_ipv4: bool,
    /// Route all IPv6 traffic through the tunnel.
    #[serde(rename = "isDefaultIPv6")]
    pub is_default_ipv6: bool,
}

/// DNS override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSettings {
    /// Source of the setting.
    pub choice: NetworkChoice,
    /// DNS transport.
    pub configuration_type: DnsProtocol,
    /// Resolver addresses.
    pub dns_servers: Vec<String>,
    /// Search domains.
    pub dns_search_domains: Vec<String>,
    /// DNS-over-HTTPS endpoint.
    #[serde(default, rename = "dnsHTTPSURL", skip_serializing_if = "Option::is_none")]
    pub dns_https_url: Option<Url>,
    /// DNS-over-TLS server name, empty when unset.
    #[serde(rename = "dnsTLSServerName")]
    pub dns_tls_server_name: String,
}

/// HTTP proxy override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Source of the setting.
    pub choice: NetworkChoice,
    /// Proxy host, empty when unset.
    pub proxy_address: String,
    /// Proxy port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<u16>,
    /// Proxy auto-configuration (PAC) script location.
    #[serde(
        default,
        rename = "proxyAutoConfigurationURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub proxy_auto_configuration_url: Option<Url>,
    /// Domains that bypass the proxy.
    pub proxy_bypass_domains: Vec<String>,
}

/// MTU override.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MtuSettings {
    /// Source of the setting.
    pub choice: NetworkChoice,
    /// Tunnel MTU, 0 when unset.
    pub mtu_bytes: u32,
}

/// Manual network overrides applied on top of the VPN configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSettings {
    /// Default gateway.
    pub gateway: GatewaySettings,
    /// DNS.
    pub dns: DnsSettings,
    /// HTTP proxy.
    pub proxy: ProxySettings,
    /// MTU.
    pub mtu: MtuSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_automatic_and_empty() {
        let settings = NetworkSettings::default();
        assert_eq!(settings.gateway.choice, NetworkChoice::Automatic);
        assert_eq!(settings.dns.configuration_type, DnsProtocol::Plain);
        assert!(settings.dns.dns_servers.is_empty());
        assert!(settings.dns.dns_tls_server_name.is_empty());
        assert!(settings.proxy.proxy_port.is_none());
        assert_eq!(settings.mtu.mtu_bytes, 0);
    }

    #[test]
    fn test_dns_protocol_raw_values() {
        assert_eq!("https".parse::<DnsProtocol>(), Ok(DnsProtocol::Https));
        assert_eq!("tls".parse::<DnsProtocol>(), Ok(DnsProtocol::Tls));
        assert!("doh".parse::<DnsProtocol>().is_err());
    }

    #[test]
    fn test_serialized_key_names() {
        let settings = NetworkSettings {
            dns: DnsSettings {
                choice: NetworkChoice::Manual,
                dns_https_url: Url::parse("https://dns.example.com/dns-query").ok(),
                ..DnsSettings::default()
            },
            ..NetworkSettings::default()
        };
        let json = serde_json::to_value(&settings).unwrap();

        assert_eq!(json["dns"]["choice"], "manual");
        assert_eq!(json["dns"]["dnsHTTPSURL"], "https://dns.example.com/dns-query");
        assert_eq!(json["gateway"]["isDefaultIPv4"], false);
        assert!(json["proxy"].get("proxyAutoConfigurationURL").is_none());
    }
}
