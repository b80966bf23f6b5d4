//! The profile model of the current app generation.
//!
//! A [`Profile`] is what the native profile store persists. It is serialized as camelCase
//! JSON; the legacy upgrade builds these values and hands them to the native side.

mod network_settings;
mod on_demand;
mod openvpn;
mod provider;

pub use network_settings::{
    DnsProtocol, DnsSettings, GatewaySettings, MtuSettings, NetworkChoice, NetworkSettings,
    ProxySettings,
};
pub use on_demand::{OnDemand, OnDemandPolicy};
pub use openvpn::{
    Endpoint, EndpointParseError, EndpointProtocol, OpenVpnConfiguration, PemContainer,
    SocketType,
};
pub use provider::{Provider, ProviderSettings, VpnProtocol};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and display data of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHeader {
    /// Stable identifier, always freshly generated.
    pub id: Uuid,
    /// User-visible name.
    pub name: String,
    /// Catalog provider the profile refers to, only set for provider profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    /// When the profile was last written.
    pub last_update: DateTime<Utc>,
}

impl ProfileHeader {
    /// Creates a header with a new random identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, provider_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            provider_name,
            last_update: Utc::now(),
        }
    }
}

/// Username and password of a VPN account.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account name, may be empty.
    pub username: String,
    /// Secret, empty when unknown.
    pub password: String,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

/// A profile pointing to a user-supplied OpenVPN server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostProfile {
    /// Parsed OpenVPN configuration.
    pub configuration: OpenVpnConfiguration,
    /// Credentials used when the configuration requires `auth-user-pass`.
    pub account: Account,
}

/// What a profile connects to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileModule {
    /// Custom host with an embedded configuration.
    Host(HostProfile),
    /// Selection from the provider catalog.
    Provider(Provider),
}

/// A VPN profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identity and display data.
    pub header: ProfileHeader,
    /// Host or provider payload.
    pub module: ProfileModule,
    /// Automatic activation rules.
    pub on_demand: OnDemand,
    /// Manual network overrides.
    pub network_settings: NetworkSettings,
}

impl Profile {
    /// Creates a host profile with default on-demand and network settings.
    #[must_use]
    pub fn host(
        header: ProfileHeader,
        configuration: OpenVpnConfiguration,
        account: Account,
    ) -> Self {
        Self {
            header,
            module: ProfileModule::Host(HostProfile {
                configuration,
                account,
            }),
            on_demand: OnDemand::default(),
            network_settings: NetworkSettings::default(),
        }
    }

    /// Creates a provider profile with default on-demand and network settings.
    #[must_use]
    pub fn provider(header: ProfileHeader, provider: Provider) -> Self {
        Self {
            header,
            module: ProfileModule::Provider(provider),
            on_demand: OnDemand::default(),
            network_settings: NetworkSettings::default(),
        }
    }

    /// Profile identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.header.id
    }

    /// Profile display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Whether this is a catalog provider profile.
    #[must_use]
    pub const fn is_provider(&self) -> bool {
        matches!(self.module, ProfileModule::Provider(_))
    }

    /// The embedded OpenVPN configuration of a host profile.
    #[must_use]
    pub const fn host_configuration(&self) -> Option<&OpenVpnConfiguration> {
        match &self.module {
            ProfileModule::Host(host) => Some(&host.configuration),
            ProfileModule::Provider(_) => None,
        }
    }

    /// The provider descriptor of a provider profile.
    #[must_use]
    pub const fn provider_descriptor(&self) -> Option<&Provider> {
        match &self.module {
            ProfileModule::Host(_) => None,
            ProfileModule::Provider(provider) => Some(provider),
        }
    }

    /// The account used to connect: the host account, or the OpenVPN account of a provider.
    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        match &self.module {
            ProfileModule::Host(host) => Some(&host.account),
            ProfileModule::Provider(provider) => provider
                .settings(VpnProtocol::OpenVpn)
                .and_then(|settings| settings.account.as_ref()),
        }
    }

    /// Serializes the profile as the JSON persisted by the native store.
    ///
    /// # Errors
    /// If serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
