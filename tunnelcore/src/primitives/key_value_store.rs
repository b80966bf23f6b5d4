use thiserror::Error;

use super::catch_callback_panic;

/// Errors that can occur when interacting with the legacy key-value store
#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Error, uniffi::Error)]
pub enum KeyValueStoreError {
    /// The requested key was not found in the store
    #[error("key not found")]
    KeyNotFound,
    /// The stored value has an unexpected type
    #[error("failed to parse value")]
    ParsingFailure,
    /// Failed to update the store
    #[error("failed to update value")]
    UpdateFailure,
    /// An unexpected error occurred in the foreign callback
    #[error("unexpected error in foreign callback: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for KeyValueStoreError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(e.reason)
    }
}

/// Preferences store of the previous app generation, implemented by the native app.
///
/// iOS backs this with `UserDefaults` of the shared app group. Values are read without any
/// namespace prefix since the legacy keys were written by the old app verbatim.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Reads a boolean value.
    ///
    /// # Errors
    /// - `KeyValueStoreError::KeyNotFound` if the key is absent
    /// - `KeyValueStoreError::ParsingFailure` if the stored value is not a boolean
    fn get_bool(&self, key: String) -> Result<bool, KeyValueStoreError>;

    /// Removes a value.
    ///
    /// # Errors
    /// - `KeyValueStoreError::KeyNotFound` if the key is absent
    /// - `KeyValueStoreError::UpdateFailure` if the store cannot be updated
    fn remove(&self, key: String) -> Result<(), KeyValueStoreError>;
}

/// Lenient helpers on top of [`KeyValueStore`].
///
/// A panic raised while lifting a foreign result surfaces as
/// `KeyValueStoreError::UnexpectedUniFFICallbackError`.
pub trait KeyValueStoreExt {
    /// Reads a boolean, falling back to `default` when the key is absent.
    ///
    /// # Errors
    /// Any store error other than `KeyNotFound`.
    fn bool_or(&self, key: &str, default: bool) -> Result<bool, KeyValueStoreError>;

    /// Removes a key, treating an absent key as already removed.
    ///
    /// # Errors
    /// Any store error other than `KeyNotFound`.
    fn remove_if_present(&self, key: &str) -> Result<(), KeyValueStoreError>;
}

impl<T> KeyValueStoreExt for T
where
    T: KeyValueStore + ?Sized,
{
    fn bool_or(&self, key: &str, default: bool) -> Result<bool, KeyValueStoreError> {
        let result = catch_callback_panic(
            "KeyValueStore.get_bool",
            std::panic::AssertUnwindSafe(|| self.get_bool(key.to_string())),
        );
        match result {
            Ok(value) => Ok(value),
            Err(KeyValueStoreError::KeyNotFound) => Ok(default),
            Err(e) => Err(e),
        }
    }

    fn remove_if_present(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let result = catch_callback_panic(
            "KeyValueStore.remove",
            std::panic::AssertUnwindSafe(|| self.remove(key.to_string())),
        );
        match result {
            Ok(()) | Err(KeyValueStoreError::KeyNotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub use tests::InMemoryKeyValueStore;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Value kept by [`InMemoryKeyValueStore`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoredValue {
        /// A boolean value.
        Bool(bool),
        /// A string value; reading it as a boolean fails to parse.
        Text(String),
    }

    /// **This is intended exclusively for testing.**
    #[derive(Debug, Default)]
    pub struct InMemoryKeyValueStore {
        values: Mutex<HashMap<String, StoredValue>>,
    }

    impl InMemoryKeyValueStore {
        /// Creates an empty store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Stores a boolean under `key`.
        pub fn set_bool(&self, key: &str, value: bool) {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), StoredValue::Bool(value));
        }

        /// Stores a string under `key`.
        pub fn set_text(&self, key: &str, value: &str) {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), StoredValue::Text(value.to_string()));
        }

        /// Whether `key` holds a value.
        pub fn contains(&self, key: &str) -> bool {
            self.values.lock().unwrap().contains_key(key)
        }

        /// Number of stored keys.
        pub fn len(&self) -> usize {
            self.values.lock().unwrap().len()
        }

        /// Whether the store holds no keys.
        pub fn is_empty(&self) -> bool {
            self.values.lock().unwrap().is_empty()
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get_bool(&self, key: String) -> Result<bool, KeyValueStoreError> {
            match self.values.lock().unwrap().get(&key) {
                Some(StoredValue::Bool(value)) => Ok(*value),
                Some(StoredValue::Text(_)) => Err(KeyValueStoreError::ParsingFailure),
                None => Err(KeyValueStoreError::KeyNotFound),
            }
        }

        fn remove(&self, key: String) -> Result<(), KeyValueStoreError> {
            self.values
                .lock()
                .unwrap()
                .remove(&key)
                .map(|_| ())
                .ok_or(KeyValueStoreError::KeyNotFound)
        }
    }

    #[test]
    fn test_bool_or_defaults_when_absent() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.bool_or("missing", true).unwrap());
        assert!(!store.bool_or("missing", false).unwrap());
    }

    #[test]
    fn test_bool_or_propagates_parsing_failure() {
        let store = InMemoryKeyValueStore::new();
        store.set_text("logFormat", "$DATE $MSG");
        assert!(matches!(
            store.bool_or("logFormat", false),
            Err(KeyValueStoreError::ParsingFailure)
        ));
    }

    #[test]
    fn test_remove_if_present_is_idempotent() {
        let store = InMemoryKeyValueStore::new();
        store.set_bool("confirmsQuit", true);

        store.remove_if_present("confirmsQuit").unwrap();
        store.remove_if_present("confirmsQuit").unwrap();

        assert!(!store.contains("confirmsQuit"));
        assert!(matches!(
            store.remove("confirmsQuit".to_string()),
            Err(KeyValueStoreError::KeyNotFound)
        ));
    }
}
