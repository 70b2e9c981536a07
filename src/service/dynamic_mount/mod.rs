#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod dependency;
pub mod machine;
pub mod state;

pub use dependency::{BackupDatabasesRun, DependencyDynamicMount};
pub use machine::MachineDynamicMount;
pub use state::StateDynamicMount;
