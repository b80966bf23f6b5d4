use super::legacy::LegacyProfileKind;
use crate::primitives::config::UpgradeConfig;
use crate::primitives::credential_store::{
    CredentialStore, CredentialStoreError, CredentialStoreExt,
};
use crate::profile::Account;

/// Builds the account of a legacy profile, looking the password up in the credential store.
///
/// The keychain context is `<bundle id>.<kind>.<profile id>`. Any lookup failure yields an
/// empty password; the profile is still migrated.
pub fn migrated_account(
    credentials: &dyn CredentialStore,
    config: &UpgradeConfig,
    kind: LegacyProfileKind,
    profile_id: &str,
    username: String,
) -> Account {
    let context = config.credential_context(kind.as_str(), profile_id);
    let password = match credentials.lookup_password(&username, &context) {
        Ok(password) => password,
        Err(CredentialStoreError::PasswordNotFound) => {
            crate::debug!("profile_migration.password_missing kind={kind} id={profile_id}");
            String::new()
        }
        Err(e) => {
            crate::warn!(
                "profile_migration.password_unavailable kind={kind} id={profile_id} error={e}"
            );
            String::new()
        }
    };

    Account { username, password }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::credential_store::InMemoryCredentialStore;

    fn config() -> UpgradeConfig {
        UpgradeConfig::new(
            "group.com.example.vpn".to_string(),
            "com.example.vpn".to_string(),
        )
    }

    #[test]
    fn test_password_is_resolved_by_context() {
        let store = InMemoryCredentialStore::new();
        store.insert("alice", "com.example.vpn.host.A-UUID", "hunter2");

        let account = migrated_account(
            &store,
            &config(),
            LegacyProfileKind::Host,
            "A-UUID",
            "alice".to_string(),
        );

        assert_eq!(account.username, "alice");
        assert_eq!(account.password, "hunter2");
        assert_eq!(
            store.lookups(),
            vec![("alice".to_string(), "com.example.vpn.host.A-UUID".to_string())]
        );
    }

    #[test]
    fn test_failures_yield_empty_password() {
        let missing = migrated_account(
            &InMemoryCredentialStore::new(),
            &config(),
            LegacyProfileKind::Provider,
            "Acme",
            "p1234".to_string(),
        );
        assert_eq!(missing.username, "p1234");
        assert!(missing.password.is_empty());

        let denied = migrated_account(
            &InMemoryCredentialStore::denying(),
            &config(),
            LegacyProfileKind::Provider,
            "Acme",
            "p1234".to_string(),
        );
        assert!(denied.password.is_empty());
    }
}
