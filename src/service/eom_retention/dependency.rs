#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{Datelike, Days};

use crate::repository::file_manager;
use crate::service::actions::{FindCandidatesAction, RemoveBatchAction};

/// Repository dependencies for [`MachineEomRetention`].
///
/// [`MachineEomRetention`]: super::MachineEomRetention
pub struct DependencyEomRetention {
    pub find_deletion_candidates: FindCandidatesAction,
    pub remove_expired_archives: RemoveBatchAction,
}

impl DependencyEomRetention {
    #[must_use]
    pub fn new() -> Self {
        Self {
            find_deletion_candidates: Box::new(|root, cutoff| {
                let mut candidates = Vec::new();
                for file in file_manager::all_files_in_directory(root)? {
                    let modified = file_manager::modification_time(&file)?;
                    if modified < cutoff && !is_month_end(modified) {
                        candidates.push(file);
                    }
                }
                Ok(candidates)
            }),
            remove_expired_archives: Box::new(|candidates| {
                for candidate in candidates {
                    file_manager::remove_file_if_exists(candidate)?;
                }
                Ok(())
            }),
        }
    }
}

impl Default for DependencyEomRetention {
    fn default() -> Self {
        Self::new()
    }
}

/// Month-end backups are kept regardless of age.
fn is_month_end(moment: chrono::DateTime<chrono::Utc>) -> bool {
    moment
        .checked_add_days(Days::new(1))
        .is_some_and(|next_day| next_day.month() != moment.month())
}

#[cfg(test)]
mod tests {
    use super::is_month_end;
    use chrono::{TimeZone, Utc};

    #[test]
    fn month_end_detection_respects_varying_month_lengths() {
        let eom = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
        assert!(is_month_end(eom));

        let mid = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        assert!(!is_month_end(mid));

        let december = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        assert!(is_month_end(december));
    }
}
