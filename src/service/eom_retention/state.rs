#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// State for an end-of-month retention sweep.  The inputs are frozen; the
/// candidate list is the one mutable scratch field, written by the
/// discovery node and consumed by the removal node.
pub struct StateEomRetention {
    client: String,
    archive_root: PathBuf,
    cutoff: DateTime<Utc>,
    deletion_candidates: Vec<PathBuf>,
}

impl StateEomRetention {
    pub fn new(
        client: impl Into<String>,
        archive_root: impl Into<PathBuf>,
        cutoff: DateTime<Utc>,
    ) -> Self {
        Self {
            client: client.into(),
            archive_root: archive_root.into(),
            cutoff,
            deletion_candidates: Vec::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    #[must_use]
    pub fn archive_root(&self) -> &Path {
        &self.archive_root
    }

    #[must_use]
    pub const fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    #[must_use]
    pub fn deletion_candidates(&self) -> &[PathBuf] {
        &self.deletion_candidates
    }

    pub fn set_deletion_candidates(&mut self, candidates: Vec<PathBuf>) {
        self.deletion_candidates = candidates;
    }
}
