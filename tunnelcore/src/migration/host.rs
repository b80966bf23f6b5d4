use std::collections::BTreeSet;

use serde_json::Value;

use super::credentials::migrated_account;
use super::error::{MigrationError, MigrationResult};
use super::legacy::{LegacyIndex, LegacyMap, LegacyMapExt, LegacyProfileKind};
use super::shared::{migrated_network_settings, migrated_on_demand};
use crate::primitives::config::UpgradeConfig;
use crate::primitives::credential_store::CredentialStore;
use crate::profile::{Endpoint, EndpointProtocol, OpenVpnConfiguration, Profile, ProfileHeader};

/// Converts a `Hosts/<uuid>.json` document into a host profile.
///
/// The name comes from the index `hostTitles`, falling back to the legacy identifier.
/// Remotes are `hostname:protocol` for every endpoint protocol that parses; protocols that
/// don't are dropped. The profile gets a new identifier.
///
/// # Errors
/// The first missing required field, see [`MigrationError`].
pub fn migrate_host_profile(
    index: &LegacyIndex,
    document: &LegacyMap,
    auth_user_pass_ids: &BTreeSet<String>,
    config: &UpgradeConfig,
    credentials: &dyn CredentialStore,
) -> MigrationResult<Profile> {
    let legacy_id = document
        .string("id")
        .ok_or(MigrationError::MissingIdentifier)?;
    let name = index.host_title(legacy_id).unwrap_or(legacy_id);

    let mut session = document
        .map("parameters")
        .and_then(|parameters| parameters.map("sessionConfiguration"))
        .cloned()
        .ok_or(MigrationError::MissingConfiguration)?;
    let hostname = session
        .string("hostname")
        .ok_or(MigrationError::MissingHostname)?
        .to_string();
    let protocols = session
        .string_list("endpointProtocols")
        .ok_or(MigrationError::MissingEndpointProtocols)?;

    let remotes = protocols
        .iter()
        .filter_map(|raw| raw.parse::<EndpointProtocol>().ok())
        .map(|protocol| Value::String(Endpoint::new(hostname.as_str(), protocol).to_string()))
        .collect();

    session.remove("hostname");
    session.remove("endpointProtocols");
    session.insert("remotes".to_string(), Value::Array(remotes));
    session.insert(
        "authUserPass".to_string(),
        Value::Bool(auth_user_pass_ids.contains(legacy_id)),
    );

    let configuration = OpenVpnConfiguration::from_map(session).map_err(|e| {
        crate::debug!("profile_migration.configuration_rejected id={legacy_id} error={e}");
        MigrationError::MissingConfiguration
    })?;

    let username = document.string("username").unwrap_or_default().to_string();
    let account = migrated_account(
        credentials,
        config,
        LegacyProfileKind::Host,
        legacy_id,
        username,
    );

    let mut profile = Profile::host(ProfileHeader::new(name, None), configuration, account);
    profile.on_demand = migrated_on_demand(document);
    profile.network_settings = migrated_network_settings(document);
    Ok(profile)
}
