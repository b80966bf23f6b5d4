use crate::primitives::key_value_store::{KeyValueStore, KeyValueStoreExt};

/// Preference keys written by the previous app generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyStoreKey {
    /// Last active profile
    ActiveProfileId,
    /// macOS login item
    LaunchesOnLogin,
    /// macOS status menu
    IsStatusMenuEnabled,
    /// Provider favorites filter
    IsShowingFavorites,
    /// macOS quit confirmation
    ConfirmsQuit,
    /// App log format
    LogFormat,
    /// Tunnel log format
    TunnelLogFormat,
    /// Log redaction
    MasksPrivateData,
    /// One-time community prompt
    DidHandleSubreddit,
    /// Persistence author tag
    PersistenceAuthor,
    /// Whether the data was already moved to the v2 store
    DidMigrateToV2,
    /// Log redaction, older spelling
    LegacyMasksPrivateData,
    /// One-time community prompt, older spelling
    LegacyDidHandleSubreddit,
    /// Last version prompted for a review
    ReviewerLastVersion,
    /// Keychain context migration marker
    DidMigrateKeychainContext,
}

impl LegacyStoreKey {
    /// Every legacy key, in removal order.
    pub const ALL: [Self; 15] = [
        Self::ActiveProfileId,
        Self::LaunchesOnLogin,
        Self::IsStatusMenuEnabled,
        Self::IsShowingFavorites,
        Self::ConfirmsQuit,
        Self::LogFormat,
        Self::TunnelLogFormat,
        Self::MasksPrivateData,
        Self::DidHandleSubreddit,
        Self::PersistenceAuthor,
        Self::DidMigrateToV2,
        Self::LegacyMasksPrivateData,
        Self::LegacyDidHandleSubreddit,
        Self::ReviewerLastVersion,
        Self::DidMigrateKeychainContext,
    ];

    /// Key as stored.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ActiveProfileId => "activeProfileId",
            Self::LaunchesOnLogin => "launchesOnLogin",
            Self::IsStatusMenuEnabled => "isStatusMenuEnabled",
            Self::IsShowingFavorites => "isShowingFavorites",
            Self::ConfirmsQuit => "confirmsQuit",
            Self::LogFormat => "logFormat",
            Self::TunnelLogFormat => "tunnelLogFormat",
            Self::MasksPrivateData => "masksPrivateData",
            Self::DidHandleSubreddit => "didHandleSubreddit",
            Self::PersistenceAuthor => "persistenceAuthor",
            Self::DidMigrateToV2 => "didMigrateToV2",
            Self::LegacyMasksPrivateData => "MasksPrivateData",
            Self::LegacyDidHandleSubreddit => "DidHandleSubreddit",
            Self::ReviewerLastVersion => "Convenience.Reviewer.LastVersion",
            Self::DidMigrateKeychainContext => "didMigrateKeychainContext",
        }
    }
}

/// Folds the legacy "migrated to v2" marker into `did_migrate` and removes every legacy key.
///
/// `did_migrate` is only read from the store while still `false`; an absent marker reads as
/// `false`. Missing keys are skipped and any other store failure is logged, so running the
/// sweep again is a no-op.
pub fn migrate_legacy_store<S>(store: &S, did_migrate: &mut bool)
where
    S: KeyValueStore + ?Sized,
{
    if !*did_migrate {
        let key = LegacyStoreKey::DidMigrateToV2.key();
        match store.bool_or(key, false) {
            Ok(value) => *did_migrate = value,
            Err(e) => crate::warn!("legacy_store.read_failed key={key} error={e}"),
        }
    }

    let mut failures = 0;
    for legacy_key in LegacyStoreKey::ALL {
        if let Err(e) = store.remove_if_present(legacy_key.key()) {
            failures += 1;
            crate::warn!(
                "legacy_store.remove_failed key={} error={e}",
                legacy_key.key()
            );
        }
    }

    crate::debug!(
        "legacy_store.swept keys={} failures={failures} did_migrate={did_migrate}",
        LegacyStoreKey::ALL.len()
    );
}
