#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::service::backup_databases::StateBackupDatabases;
use crate::shell::Secret;

/// State for a mount-wrapped backup run.  The share coordinates are
/// frozen inputs; the nested backup state is handed to the inner machine
/// exactly once.
pub struct StateDynamicMount {
    unc: String,
    mount_point: PathBuf,
    account_name: String,
    account_key: Secret,
    backup: Option<StateBackupDatabases>,
}

impl StateDynamicMount {
    pub fn new(
        unc: impl Into<String>,
        mount_point: impl Into<PathBuf>,
        account_name: impl Into<String>,
        account_key: Secret,
        backup: StateBackupDatabases,
    ) -> Self {
        Self {
            unc: unc.into(),
            mount_point: mount_point.into(),
            account_name: account_name.into(),
            account_key,
            backup: Some(backup),
        }
    }

    #[must_use]
    pub fn unc(&self) -> &str {
        &self.unc
    }

    #[must_use]
    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    #[must_use]
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    #[must_use]
    pub const fn account_key(&self) -> &Secret {
        &self.account_key
    }

    /// Hands the nested backup state to the invoking node.  Returns
    /// `None` on a second call.
    pub fn take_backup_state(&mut self) -> Option<StateBackupDatabases> {
        self.backup.take()
    }
}
