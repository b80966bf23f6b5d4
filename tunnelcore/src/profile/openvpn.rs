use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Failure to parse a transport protocol or remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointParseError {
    /// The socket type is not one of the OpenVPN transports
    #[error("unknown socket type: {0}")]
    UnknownSocketType(String),
    /// The port is not a valid 16-bit number
    #[error("invalid port: {0}")]
    InvalidPort(String),
    /// The remote has no `host:protocol` shape
    #[error("malformed remote: {0}")]
    MalformedRemote(String),
}

/// Transport socket of an OpenVPN remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocketType {
    /// UDP, any address family
    Udp,
    /// UDP over IPv4 only
    Udp4,
    /// UDP over IPv6 only
    Udp6,
    /// TCP, any address family
    Tcp,
    /// TCP over IPv4 only
    Tcp4,
    /// TCP over IPv6 only
    Tcp6,
}

impl SocketType {
    /// Lowercase OpenVPN spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Udp4 => "udp4",
            Self::Udp6 => "udp6",
            Self::Tcp => "tcp",
            Self::Tcp4 => "tcp4",
            Self::Tcp6 => "tcp6",
        }
    }
}

impl FromStr for SocketType {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(Self::Udp),
            "udp4" => Ok(Self::Udp4),
            "udp6" => Ok(Self::Udp6),
            "tcp" => Ok(Self::Tcp),
            "tcp4" => Ok(Self::Tcp4),
            "tcp6" => Ok(Self::Tcp6),
            _ => Err(EndpointParseError::UnknownSocketType(s.to_string())),
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Socket type plus optional port, written `udp` or `udp:1194`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointProtocol {
    /// Transport socket.
    pub socket_type: SocketType,
    /// Port, `None` for the OpenVPN default.
    pub port: Option<u16>,
}

impl FromStr for EndpointProtocol {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (socket, port) = match s.split_once(':') {
            Some((socket, port)) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| EndpointParseError::InvalidPort(port.to_string()))?;
                (socket, Some(port))
            }
            None => (s, None),
        };
        Ok(Self {
            socket_type: socket.parse()?,
            port,
        })
    }
}

impl fmt::Display for EndpointProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.socket_type),
            None => write!(f, "{}", self.socket_type),
        }
    }
}

/// A reachable remote: `host:socket` or `host:socket:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    /// Hostname or address.
    pub host: String,
    /// Transport to reach `host` with.
    pub protocol: EndpointProtocol,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, protocol: EndpointProtocol) -> Self {
        Self {
            host: host.into(),
            protocol,
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EndpointParseError::MalformedRemote(s.to_string());

        let (rest, last) = s.rsplit_once(':').ok_or_else(malformed)?;
        let (host, protocol) = if let Ok(port) = last.parse::<u16>() {
            let (host, socket) = rest.rsplit_once(':').ok_or_else(malformed)?;
            let protocol = EndpointProtocol {
                socket_type: socket.parse()?,
                port: Some(port),
            };
            (host, protocol)
        } else {
            let protocol = EndpointProtocol {
                socket_type: last.parse()?,
                port: None,
            };
            (rest, protocol)
        };

        if host.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(host, protocol))
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.protocol)
    }
}

/// PEM-encoded certificate or key.
///
/// Accepts both the bare PEM string and the `{"pem": "..."}` object form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PemContainer {
    /// PEM text including the armor lines.
    pub pem: String,
}

impl<'de> Deserialize<'de> for PemContainer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(String),
            Wrapped { pem: String },
        }

        let pem = match Repr::deserialize(deserializer)? {
            Repr::Bare(pem) | Repr::Wrapped { pem } => pem,
        };
        Ok(Self { pem })
    }
}

/// OpenVPN session configuration embedded in a host profile.
///
/// Well-known options are typed; every other option is kept verbatim in `other` so nothing
/// from the legacy configuration is lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenVpnConfiguration {
    /// Remotes tried in order; never empty.
    #[serde(deserialize_with = "non_empty_remotes")]
    pub remotes: Vec<Endpoint>,
    /// Whether the server expects `auth-user-pass` credentials.
    #[serde(default)]
    pub auth_user_pass: bool,
    /// Data channel cipher, e.g. `AES-256-GCM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher: Option<String>,
    /// HMAC digest, e.g. `SHA256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Certificate authority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<PemContainer>,
    /// Client certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<PemContainer>,
    /// Client private key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PemContainer>,
    /// Keep-alive ping interval in seconds.
    #[serde(
        default,
        rename = "keepAliveSeconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub keep_alive_interval: Option<f64>,
    /// Renegotiation interval in seconds.
    #[serde(
        default,
        rename = "renegotiatesAfterSeconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub renegotiates_after: Option<f64>,
    /// Whether to verify the server certificate extended key usage.
    #[serde(default, rename = "checksEKU", skip_serializing_if = "Option::is_none")]
    pub checks_eku: Option<bool>,
    /// Whether to shuffle `remotes` before connecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub randomize_endpoint: Option<bool>,
    /// DNS servers pushed by the configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_servers: Option<Vec<String>>,
    /// DNS search domains pushed by the configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_domains: Option<Vec<String>>,
    /// Tunnel MTU in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    /// Remaining options, passed through untouched.
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl OpenVpnConfiguration {
    /// Decodes a configuration from a generic JSON map.
    ///
    /// # Errors
    /// If a typed option has the wrong type or `remotes` is missing, malformed or empty.
    pub fn from_map(
        map: serde_json::Map<String, serde_json::Value>,
    ) -> serde_json::Result<Self> {
        serde_json::from_value(serde_json::Value::Object(map))
    }
}

fn non_empty_remotes<'de, D>(deserializer: D) -> Result<Vec<Endpoint>, D::Error>
where
    D: Deserializer<'de>,
{
    let remotes = Vec::<Endpoint>::deserialize(deserializer)?;
    if remotes.is_empty() {
        return Err(D::Error::custom("at least one remote is required"));
    }
    Ok(remotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_protocol_parsing() {
        let udp: EndpointProtocol = "udp".parse().unwrap();
        assert_eq!(udp.socket_type, SocketType::Udp);
        assert_eq!(udp.port, None);
        assert_eq!(udp.to_string(), "udp");

        let tcp: EndpointProtocol = "TCP:443".parse().unwrap();
        assert_eq!(tcp.socket_type, SocketType::Tcp);
        assert_eq!(tcp.port, Some(443));
        assert_eq!(tcp.to_string(), "tcp:443");

        assert!("quic".parse::<EndpointProtocol>().is_err());
        assert!("udp:99999".parse::<EndpointProtocol>().is_err());
        assert!("udp:".parse::<EndpointProtocol>().is_err());
    }

    #[test]
    fn test_endpoint_parsing() {
        let endpoint: Endpoint = "vpn.example.com:udp".parse().unwrap();
        assert_eq!(endpoint.host, "vpn.example.com");
        assert_eq!(endpoint.protocol.port, None);

        let endpoint: Endpoint = "vpn.example.com:UDP:1194".parse().unwrap();
        assert_eq!(endpoint.protocol.port, Some(1194));
        assert_eq!(endpoint.to_string(), "vpn.example.com:udp:1194");

        let endpoint: Endpoint = "2001:db8::1:tcp6:443".parse().unwrap();
        assert_eq!(endpoint.host, "2001:db8::1");
        assert_eq!(endpoint.protocol.socket_type, SocketType::Tcp6);

        assert!(":udp".parse::<Endpoint>().is_err());
        assert!("vpn.example.com".parse::<Endpoint>().is_err());
        assert!("vpn.example.com:1194".parse::<Endpoint>().is_err());
    }

    #[test]
    fn test_pem_container_forms() {
        let bare: PemContainer = serde_json::from_value(json!("-----BEGIN-----")).unwrap();
        let wrapped: PemContainer =
            serde_json::from_value(json!({ "pem": "-----BEGIN-----" })).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_configuration_keeps_unknown_options() {
        let configuration: OpenVpnConfiguration = serde_json::from_value(json!({
            "remotes": ["vpn.example.com:udp"],
            "authUserPass": true,
            "cipher": "AES-128-CBC",
            "keepAliveSeconds": 25,
            "checksEKU": true,
            "compressionFraming": 1,
            "tlsWrap": { "strategy": "auth" }
        }))
        .unwrap();

        assert!(configuration.auth_user_pass);
        assert_eq!(configuration.keep_alive_interval, Some(25.0));
        assert_eq!(configuration.checks_eku, Some(true));
        assert_eq!(configuration.other.get("compressionFraming"), Some(&json!(1)));
        assert!(configuration.other.contains_key("tlsWrap"));

        let encoded = serde_json::to_value(&configuration).unwrap();
        assert_eq!(encoded["remotes"], json!(["vpn.example.com:udp"]));
        assert_eq!(encoded["compressionFraming"], json!(1));
    }

    #[test]
    fn test_configuration_rejects_empty_remotes() {
        let result =
            serde_json::from_value::<OpenVpnConfiguration>(json!({ "remotes": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_configuration_rejects_mistyped_option() {
        let result = serde_json::from_value::<OpenVpnConfiguration>(json!({
            "remotes": ["vpn.example.com:udp"],
            "cipher": 42
        }));
        assert!(result.is_err());
    }
}
