use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::Account;

/// VPN protocol a provider server is reached with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VpnProtocol {
    /// OpenVPN
    #[serde(rename = "ovpn")]
    OpenVpn,
    /// WireGuard
    #[serde(rename = "wg")]
    WireGuard,
}

impl VpnProtocol {
    /// Short tag used in persisted identifiers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenVpn => "ovpn",
            Self::WireGuard => "wg",
        }
    }
}

/// Per-protocol selection within a provider catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// Selected server, see [`Provider::server_id`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    /// Selected connection preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<String>,
    /// Favorite locations, `provider:country:area`-style identifiers.
    #[serde(default)]
    pub favorite_location_ids: BTreeSet<String>,
    /// Provider account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

/// A profile's selection from the provider catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Catalog name of the provider.
    pub name: String,
    /// Settings per protocol.
    #[serde(default)]
    pub vpn_settings: BTreeMap<VpnProtocol, ProviderSettings>,
}

impl Provider {
    /// Creates a provider descriptor without settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vpn_settings: BTreeMap::new(),
        }
    }

    /// Settings for `protocol`, if any.
    #[must_use]
    pub fn settings(&self, protocol: VpnProtocol) -> Option<&ProviderSettings> {
        self.vpn_settings.get(&protocol)
    }

    /// Catalog identifier of a server: `<provider>:<protocol>:<api id>`.
    #[must_use]
    pub fn server_id(provider_name: &str, protocol: VpnProtocol, api_id: &str) -> String {
        [provider_name, protocol.as_str(), api_id].join(":")
    }
}
