#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod delimited;
pub mod secret;

pub use delimited::{Atom, CommaDelimited, CommaItem, EqualDelimited, SpaceDelimited, SpaceItem};
pub use secret::Secret;
