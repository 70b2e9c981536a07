#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::encryption::Encryption;
use super::error::{ConfigError, Result};
use crate::shell::Secret;

/// The configuration file read on every host when no override is given.
pub const DEFAULT_CONFIG_FILE: &str = "/etc/long_term_storage/config.yaml";

const SECRETS_SECTION: &str = "secrets";

/// The loaded configuration: cleartext groups plus the encrypted
/// `secrets:` section.  Immutable after load; only the `set` utility
/// rewrites it, atomically.
pub struct Config {
    path: PathBuf,
    groups: BTreeMap<String, BTreeMap<String, Value>>,
    secrets: Secrets,
}

/// The encrypted section.  Values decrypt on access and are returned
/// wrapped in the masking [`Secret`] type, so a decrypted value can never
/// reach a log record through a default rendering.
pub struct Secrets {
    groups: BTreeMap<String, BTreeMap<String, String>>,
    encryption: Encryption,
}

impl Secrets {
    /// # Errors
    /// `MissingKey` when the group/key pair is not present; `Decrypt`
    /// when the stored literal was not produced by the installed key.
    pub fn value(&self, group: &str, key: &str) -> Result<Secret> {
        let token = self
            .groups
            .get(group)
            .and_then(|entries| entries.get(key))
            .ok_or_else(|| ConfigError::MissingKey {
                path: format!("{SECRETS_SECTION}.{group}.{key}"),
            })?;
        let clear = self
            .encryption
            .decrypt(token, &format!("{SECRETS_SECTION}.{group}.{key}"))?;
        Ok(Secret::new(clear))
    }
}

impl Config {
    /// Reads and decodes the configuration file, priming the decryption
    /// key from *key_file*.
    ///
    /// # Errors
    /// Returns an error when the file or keyfile is unreadable, the YAML
    /// does not decode, or the structure is not two-level groups.
    pub fn load(path: &Path, key_file: &Path) -> Result<Self> {
        let encryption = Encryption::from_key_file(key_file)?;
        let raw = fs::read_to_string(path)?;
        let document: BTreeMap<String, Value> = serde_yaml::from_str(&raw)?;

        let mut groups = BTreeMap::new();
        let mut secret_groups = BTreeMap::new();

        for (name, value) in document {
            if name == SECRETS_SECTION {
                secret_groups = decode_secret_section(&value)?;
            } else {
                groups.insert(name.clone(), decode_group(&name, &value)?);
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            groups,
            secrets: Secrets {
                groups: secret_groups,
                encryption,
            },
        })
    }

    #[must_use]
    pub fn from_file(&self) -> &Path {
        &self.path
    }

    /// # Errors
    /// `MissingKey` when the group/key pair is not present.
    pub fn value(&self, group: &str, key: &str) -> Result<&Value> {
        self.groups
            .get(group)
            .and_then(|entries| entries.get(key))
            .ok_or_else(|| ConfigError::MissingKey {
                path: format!("{group}.{key}"),
            })
    }

    /// # Errors
    /// `MissingKey` when absent, `Invalid` when the value is not a string.
    pub fn string(&self, group: &str, key: &str) -> Result<String> {
        let value = self.value(group, key)?;
        value
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| ConfigError::Invalid(format!("{group}.{key} is not a string")))
    }

    /// # Errors
    /// `MissingKey` when absent, `Invalid` when the value is not an integer.
    pub fn integer(&self, group: &str, key: &str) -> Result<i64> {
        let value = self.value(group, key)?;
        value
            .as_i64()
            .ok_or_else(|| ConfigError::Invalid(format!("{group}.{key} is not an integer")))
    }

    #[must_use]
    pub const fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    /// Re-encrypts *value* under the installed key and rewrites the
    /// configuration file atomically (write-temp + rename), preserving
    /// every other entry.
    ///
    /// # Errors
    /// Returns an error when the rewrite fails; the original file is left
    /// untouched in that case.
    pub fn set_secret(&mut self, group: &str, key: &str, value: &str) -> Result<()> {
        let token = self.secrets.encryption.encrypt(value);
        self.secrets
            .groups
            .entry(group.to_string())
            .or_default()
            .insert(key.to_string(), token);
        self.rewrite()
    }

    fn rewrite(&self) -> Result<()> {
        let mut document: BTreeMap<String, Value> = BTreeMap::new();
        for (name, entries) in &self.groups {
            let mapping: serde_yaml::Mapping = entries
                .iter()
                .map(|(key, value)| (Value::String(key.clone()), value.clone()))
                .collect();
            document.insert(name.clone(), Value::Mapping(mapping));
        }
        let secret_section: serde_yaml::Mapping = self
            .secrets
            .groups
            .iter()
            .map(|(group, entries)| {
                let group_mapping: serde_yaml::Mapping = entries
                    .iter()
                    .map(|(key, token)| {
                        (Value::String(key.clone()), Value::String(token.clone()))
                    })
                    .collect();
                (Value::String(group.clone()), Value::Mapping(group_mapping))
            })
            .collect();
        document.insert(SECRETS_SECTION.to_string(), Value::Mapping(secret_section));

        let rendered = serde_yaml::to_string(&document)?;
        let temporary = self.path.with_extension("yaml.tmp");
        fs::write(&temporary, rendered)?;
        fs::rename(&temporary, &self.path)?;
        Ok(())
    }
}

fn decode_group(name: &str, value: &Value) -> Result<BTreeMap<String, Value>> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| ConfigError::Invalid(format!("{name} is not a group of keys")))?;
    let mut entries = BTreeMap::new();
    for (key, entry) in mapping {
        let key = key
            .as_str()
            .ok_or_else(|| ConfigError::Invalid(format!("{name} holds a non-string key")))?;
        entries.insert(key.to_string(), entry.clone());
    }
    Ok(entries)
}

fn decode_secret_section(value: &Value) -> Result<BTreeMap<String, BTreeMap<String, String>>> {
    let mapping = value
        .as_mapping()
        .ok_or_else(|| ConfigError::Invalid(format!("{SECRETS_SECTION} is not a group")))?;
    let mut groups = BTreeMap::new();
    for (group, entries) in mapping {
        let group = group.as_str().ok_or_else(|| {
            ConfigError::Invalid(format!("{SECRETS_SECTION} holds a non-string group name"))
        })?;
        let entries = entries.as_mapping().ok_or_else(|| {
            ConfigError::Invalid(format!("{SECRETS_SECTION}.{group} is not a group of keys"))
        })?;
        let mut tokens = BTreeMap::new();
        for (key, token) in entries {
            let key = key.as_str().ok_or_else(|| {
                ConfigError::Invalid(format!("{SECRETS_SECTION}.{group} holds a non-string key"))
            })?;
            let token = token.as_str().ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "{SECRETS_SECTION}.{group}.{key} is not an encrypted literal"
                ))
            })?;
            tokens.insert(key.to_string(), token.to_string());
        }
        groups.insert(group.to_string(), tokens);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::config::encryption::{generate_key_file, Encryption};
    use crate::config::error::ConfigError;
    use std::fs;
    use std::path::PathBuf;

    fn write_fixture(value_token: &str) -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("fernet.key");
        let config_file = dir.path().join("config.yaml");
        fs::write(
            &config_file,
            format!(
                "logging:\n  level: debug\n  backup_count: 7\nsecrets:\n  postgres:\n    password: {value_token}\n"
            ),
        )
        .unwrap();
        (dir, config_file, key_file)
    }

    fn fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("fernet.key");
        generate_key_file(&key_file).unwrap();
        let token = Encryption::from_key_file(&key_file)
            .unwrap()
            .encrypt("hunter2");

        let config_file = dir.path().join("config.yaml");
        fs::write(
            &config_file,
            format!(
                "logging:\n  level: debug\n  backup_count: 7\nsecrets:\n  postgres:\n    password: {token}\n"
            ),
        )
        .unwrap();

        let config = Config::load(&config_file, &key_file).unwrap();
        (dir, config)
    }

    #[test]
    fn cleartext_groups_read_by_dotted_traversal() {
        let (_dir, config) = fixture();
        assert_eq!(config.string("logging", "level").unwrap(), "debug");
        assert_eq!(config.integer("logging", "backup_count").unwrap(), 7);
    }

    #[test]
    fn secrets_decrypt_into_the_masking_type() {
        let (_dir, config) = fixture();
        let secret = config.secrets().value("postgres", "password").unwrap();
        assert_eq!(secret.reveal(), "hunter2");
        assert_eq!(secret.to_string(), "**********");
    }

    #[test]
    fn missing_keys_report_the_dotted_path() {
        let (_dir, config) = fixture();
        let error = config.string("logging", "rotation").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::MissingKey { ref path } if path == "logging.rotation"
        ));

        let error = config.secrets().value("postgres", "user").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::MissingKey { ref path } if path == "secrets.postgres.user"
        ));
    }

    #[test]
    fn a_foreign_token_reports_a_decrypt_error() {
        let (_dir, config_file, key_file) = write_fixture("gAAAAABnot-a-real-token");
        generate_key_file(&key_file).unwrap();
        let config = Config::load(&config_file, &key_file).unwrap();

        let error = config.secrets().value("postgres", "password").unwrap_err();
        assert!(matches!(error, ConfigError::Decrypt { .. }));
    }

    #[test]
    fn set_rewrites_the_file_preserving_every_other_entry() {
        let (_dir, mut config) = fixture();
        let path = config.from_file().to_path_buf();
        let key_file = path.parent().unwrap().join("fernet.key");

        config.set_secret("postgres", "user", "backup_robot").unwrap();

        let reloaded = Config::load(&path, &key_file).unwrap();
        assert_eq!(
            reloaded.secrets().value("postgres", "user").unwrap().reveal(),
            "backup_robot"
        );
        assert_eq!(
            reloaded
                .secrets()
                .value("postgres", "password")
                .unwrap()
                .reveal(),
            "hunter2"
        );
        assert_eq!(reloaded.string("logging", "level").unwrap(), "debug");
    }
}
