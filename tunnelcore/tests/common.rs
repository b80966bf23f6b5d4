#![allow(dead_code)]

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tunnelcore::primitives::credential_store::{CredentialStore, CredentialStoreError};
use tunnelcore::primitives::filesystem::{FileSystem, FileSystemError};
use tunnelcore::primitives::key_value_store::{KeyValueStore, KeyValueStoreError};
use tunnelcore::primitives::logger::{set_logger, LogLevel, Logger};

pub const APP_GROUP: &str = "group.com.example.vpn";
pub const BUNDLE_ID: &str = "com.example.vpn";

/// A shared container on disk, removed when dropped.
pub struct TempContainer {
    dir: tempfile::TempDir,
}

impl TempContainer {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("tunnelcore-")
            .tempdir()
            .unwrap();
        std::fs::create_dir_all(dir.path().join("Documents")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative_path: &str, content: &str) {
        let path = self.root().join("Documents").join(relative_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    pub fn write_json(&self, relative_path: &str, value: &serde_json::Value) {
        self.write(relative_path, &value.to_string());
    }

    pub fn file_system(&self) -> Arc<DiskFileSystem> {
        Arc::new(DiskFileSystem {
            containers: HashMap::from([(APP_GROUP.to_string(), self.root().to_path_buf())]),
        })
    }
}

/// Filesystem backed by `std::fs`.
pub struct DiskFileSystem {
    containers: HashMap<String, PathBuf>,
}

impl FileSystem for DiskFileSystem {
    fn container_directory(&self, app_group: String) -> Option<String> {
        self.containers
            .get(&app_group)
            .map(|root| root.to_string_lossy().into_owned())
    }

    fn list_files_at_directory(&self, folder_path: String) -> Result<Vec<String>, FileSystemError> {
        let entries = std::fs::read_dir(&folder_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileSystemError::DirectoryDoesNotExist,
            _ => FileSystemError::IoFailure(e.to_string()),
        })?;

        Ok(entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect())
    }

    fn read_file(&self, file_path: String) -> Result<Vec<u8>, FileSystemError> {
        std::fs::read(&file_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FileSystemError::FileDoesNotExist,
            _ => FileSystemError::IoFailure(e.to_string()),
        })
    }
}

/// Preferences holding booleans only.
#[derive(Default)]
pub struct Preferences {
    values: Mutex<HashMap<String, bool>>,
}

impl Preferences {
    pub fn set(&self, key: &str, value: bool) {
        self.values.lock().unwrap().insert(key.to_string(), value);
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.values.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for Preferences {
    fn get_bool(&self, key: String) -> Result<bool, KeyValueStoreError> {
        self.values
            .lock()
            .unwrap()
            .get(&key)
            .copied()
            .ok_or(KeyValueStoreError::KeyNotFound)
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

/// Keychain keyed by `(username, context)`.
#[derive(Default)]
pub struct Keychain {
    items: Mutex<HashMap<(String, String), String>>,
}

impl Keychain {
    pub fn add(&self, username: &str, context: &str, password: &str) {
        self.items.lock().unwrap().insert(
            (username.to_string(), context.to_string()),
            password.to_string(),
        );
    }
}

impl CredentialStore for Keychain {
    fn password(&self, username: String, context: String) -> Result<String, CredentialStoreError> {
        self.items
            .lock()
            .unwrap()
            .get(&(username, context))
            .cloned()
            .ok_or(CredentialStoreError::PasswordNotFound)
    }
}

/// Logger keeping every message, installed once per test binary.
#[derive(Default)]
pub struct CapturingLogger {
    messages: Mutex<Vec<(LogLevel, String)>>,
}

impl CapturingLogger {
    pub fn install() -> Arc<Self> {
        static INSTANCE: OnceLock<Arc<CapturingLogger>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                let logger = Arc::new(Self::default());
                set_logger(logger.clone());
                logger
            })
            .clone()
    }

    pub fn messages_containing(&self, needle: &str) -> Vec<(LogLevel, String)> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, message)| message.contains(needle))
            .cloned()
            .collect()
    }
}

impl Logger for CapturingLogger {
    fn log(&self, level: LogLevel, message: String) {
        self.messages.lock().unwrap().push((level, message));
    }
}
