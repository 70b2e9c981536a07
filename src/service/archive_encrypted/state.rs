#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// State for one archive-and-encrypt run.  Every field is a frozen input.
pub struct StateArchiveEncrypted {
    source_path: PathBuf,
    staging_folder: PathBuf,
    archive_folder: PathBuf,
    gpg_key_name: String,
}

impl StateArchiveEncrypted {
    pub fn new(
        source_path: impl Into<PathBuf>,
        staging_folder: impl Into<PathBuf>,
        archive_folder: impl Into<PathBuf>,
        gpg_key_name: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            staging_folder: staging_folder.into(),
            archive_folder: archive_folder.into(),
            gpg_key_name: gpg_key_name.into(),
        }
    }

    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    #[must_use]
    pub fn staging_folder(&self) -> &Path {
        &self.staging_folder
    }

    #[must_use]
    pub fn archive_folder(&self) -> &Path {
        &self.archive_folder
    }

    #[must_use]
    pub fn gpg_key_name(&self) -> &str {
        &self.gpg_key_name
    }

    fn source_file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn staging_file_path(&self) -> PathBuf {
        self.staging_folder.join(self.source_file_name())
    }

    #[must_use]
    pub fn encrypted_file_path(&self) -> PathBuf {
        self.staging_folder
            .join(format!("{}.gpg", self.source_file_name()))
    }

    #[must_use]
    pub fn archive_encrypted_path(&self) -> PathBuf {
        self.archive_folder
            .join(format!("{}.gpg", self.source_file_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::StateArchiveEncrypted;

    #[test]
    fn derived_paths_follow_the_source_file_name() {
        let state =
            StateArchiveEncrypted::new("/source/file.txt", "/staging", "/archive", "test_key");
        assert_eq!(state.staging_file_path().to_str().unwrap(), "/staging/file.txt");
        assert_eq!(
            state.encrypted_file_path().to_str().unwrap(),
            "/staging/file.txt.gpg"
        );
        assert_eq!(
            state.archive_encrypted_path().to_str().unwrap(),
            "/archive/file.txt.gpg"
        );
    }
}
