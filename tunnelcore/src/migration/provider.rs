use super::credentials::migrated_account;
use super::error::{MigrationError, MigrationResult};
use super::legacy::{LegacyMap, LegacyMapExt, LegacyProfileKind};
use super::shared::{migrated_network_settings, migrated_on_demand};
use crate::primitives::config::UpgradeConfig;
use crate::primitives::credential_store::CredentialStore;
use crate::profile::{Profile, ProfileHeader, Provider, ProviderSettings, VpnProtocol};

/// Converts a `Providers/<name>.json` document into a provider profile.
///
/// The legacy selection is carried over as OpenVPN settings: `poolId` becomes the server,
/// `presetId` the preset and every `favoriteGroupIds` entry `region/city` becomes the
/// location `<name>:region:city`.
///
/// # Errors
/// `MigrationError::MissingProviderName` if the document has no string `name`.
pub fn migrate_provider_profile(
    document: &LegacyMap,
    config: &UpgradeConfig,
    credentials: &dyn CredentialStore,
) -> MigrationResult<Profile> {
    let name = document
        .string("name")
        .ok_or(MigrationError::MissingProviderName)?;

    let username = document.string("username").unwrap_or_default().to_string();
    let account = migrated_account(
        credentials,
        config,
        LegacyProfileKind::Provider,
        name,
        username,
    );

    let settings = ProviderSettings {
        server_id: document
            .string("poolId")
            .map(|api_id| Provider::server_id(name, VpnProtocol::OpenVpn, api_id)),
        preset_id: document.string("presetId").map(ToString::to_string),
        favorite_location_ids: document
            .string_list("favoriteGroupIds")
            .unwrap_or_default()
            .iter()
            .map(|group| format!("{name}:{}", group.replace('/', ":")))
            .collect(),
        account: Some(account),
    };

    let mut provider = Provider::new(name);
    provider.vpn_settings.insert(VpnProtocol::OpenVpn, settings);

    let header = ProfileHeader::new(name, Some(name.to_string()));
    let mut profile = Profile::provider(header, provider);
    profile.on_demand = migrated_on_demand(document);
    profile.network_settings = migrated_network_settings(document);
    Ok(profile)
}
