#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fmt;

use super::secret::Secret;

/// A plain token or a masking secret.  The smallest fragment the command
/// builder composes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Plain(String),
    Secret(Secret),
}

impl Atom {
    #[must_use]
    pub fn reveal(&self) -> &str {
        match self {
            Self::Plain(value) => value,
            Self::Secret(secret) => secret.reveal(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(value),
            Self::Secret(secret) => write!(f, "{secret}"),
        }
    }
}

impl From<&str> for Atom {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for Atom {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<Secret> for Atom {
    fn from(value: Secret) -> Self {
        Self::Secret(value)
    }
}

/// `left=right`, with the right-hand side masked when it is a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualDelimited {
    left: String,
    right: Atom,
}

impl EqualDelimited {
    pub fn new(left: impl Into<String>, right: impl Into<Atom>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// The rendered pair with the secret value unmasked.
    #[must_use]
    pub fn reveal(&self) -> String {
        format!("{}={}", self.left, self.right.reveal())
    }
}

impl fmt::Display for EqualDelimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.left, self.right)
    }
}

/// An item of a comma-delimited fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommaItem {
    Plain(String),
    Secret(Secret),
    Equal(EqualDelimited),
}

impl CommaItem {
    fn reveal(&self) -> String {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Secret(secret) => secret.reveal().to_string(),
            Self::Equal(pair) => pair.reveal(),
        }
    }
}

impl fmt::Display for CommaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(value),
            Self::Secret(secret) => write!(f, "{secret}"),
            Self::Equal(pair) => write!(f, "{pair}"),
        }
    }
}

impl From<&str> for CommaItem {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for CommaItem {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<Secret> for CommaItem {
    fn from(value: Secret) -> Self {
        Self::Secret(value)
    }
}

impl From<EqualDelimited> for CommaItem {
    fn from(value: EqualDelimited) -> Self {
        Self::Equal(value)
    }
}

/// A comma-joined sequence, typically mount or connection options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommaDelimited {
    items: Vec<CommaItem>,
}

impl CommaDelimited {
    #[must_use]
    pub fn new(items: Vec<CommaItem>) -> Self {
        Self { items }
    }

    /// The single comma-joined string with every secret unmasked.
    #[must_use]
    pub fn reveal(&self) -> String {
        self.items
            .iter()
            .map(CommaItem::reveal)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for CommaDelimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&rendered)
    }
}

/// An item of a space-delimited command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceItem {
    Plain(String),
    Secret(Secret),
    Equal(EqualDelimited),
    Comma(CommaDelimited),
}

impl SpaceItem {
    fn reveal(&self) -> String {
        match self {
            Self::Plain(value) => value.clone(),
            Self::Secret(secret) => secret.reveal().to_string(),
            Self::Equal(pair) => pair.reveal(),
            Self::Comma(items) => items.reveal(),
        }
    }
}

impl fmt::Display for SpaceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.write_str(value),
            Self::Secret(secret) => write!(f, "{secret}"),
            Self::Equal(pair) => write!(f, "{pair}"),
            Self::Comma(items) => write!(f, "{items}"),
        }
    }
}

impl From<&str> for SpaceItem {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for SpaceItem {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl From<Secret> for SpaceItem {
    fn from(value: Secret) -> Self {
        Self::Secret(value)
    }
}

impl From<EqualDelimited> for SpaceItem {
    fn from(value: EqualDelimited) -> Self {
        Self::Equal(value)
    }
}

impl From<CommaDelimited> for SpaceItem {
    fn from(value: CommaDelimited) -> Self {
        Self::Comma(value)
    }
}

/// A full command line.  `Display` is the loggable form with every secret
/// masked; [`SpaceDelimited::reveal`] is the argument vector handed to
/// the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceDelimited {
    items: Vec<SpaceItem>,
}

impl SpaceDelimited {
    #[must_use]
    pub fn new(items: Vec<SpaceItem>) -> Self {
        Self { items }
    }

    /// The argument vector with every secret unmasked.
    #[must_use]
    pub fn reveal(&self) -> Vec<String> {
        self.items.iter().map(SpaceItem::reveal).collect()
    }
}

impl fmt::Display for SpaceDelimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::{CommaDelimited, EqualDelimited, SpaceDelimited};
    use crate::shell::Secret;

    #[test]
    fn equal_delimited_masks_a_secret_right_hand_side() {
        let pair = EqualDelimited::new("password", Secret::new("s3cr3t"));
        assert_eq!(pair.to_string(), "password=**********");
        assert_eq!(pair.reveal(), "password=s3cr3t");
    }

    #[test]
    fn equal_delimited_leaves_plain_values_alone() {
        let pair = EqualDelimited::new("user", "u");
        assert_eq!(pair.to_string(), "user=u");
        assert_eq!(pair.reveal(), "user=u");
    }

    #[test]
    fn comma_delimited_joins_displays_and_reveals() {
        let options = CommaDelimited::new(vec![
            EqualDelimited::new("user", "u").into(),
            EqualDelimited::new("password", Secret::new("s3cr3t")).into(),
            "serverino".into(),
        ]);
        assert_eq!(options.to_string(), "user=u,password=**********,serverino");
        assert_eq!(options.reveal(), "user=u,password=s3cr3t,serverino");
    }

    #[test]
    fn a_mount_command_masks_exactly_the_secret() {
        let command = SpaceDelimited::new(vec![
            "mount".into(),
            "-o".into(),
            CommaDelimited::new(vec![
                EqualDelimited::new("user", "u").into(),
                EqualDelimited::new("password", Secret::new("s3cr3t")).into(),
            ])
            .into(),
        ]);

        let display = command.to_string();
        assert_eq!(display.matches("**********").count(), 1);
        assert!(!display.contains("s3cr3t"));

        let argv = command.reveal();
        assert_eq!(argv.last().map(String::as_str), Some("user=u,password=s3cr3t"));
    }

    #[test]
    fn bare_secrets_mask_inside_a_command_line() {
        let command = SpaceDelimited::new(vec![
            "gpg".into(),
            "--passphrase".into(),
            Secret::new("hunter2").into(),
        ]);
        assert_eq!(command.to_string(), "gpg --passphrase **********");
        assert_eq!(command.reveal(), vec!["gpg", "--passphrase", "hunter2"]);
    }
}
