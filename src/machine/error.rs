#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

/// A machine definition failed its load-time validation.  These are
/// programming errors: a validated machine never raises them at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("no entry node defined for {machine}")]
    NoEntryNode { machine: String },

    #[error("more than one entry node defined for {machine}: {nodes:?}")]
    MultipleEntryNodes { machine: String, nodes: Vec<String> },

    #[error("no terminal nodes defined for {machine}")]
    NoTerminalNode { machine: String },

    #[error("duplicate node name: {node}")]
    DuplicateNode { node: String },

    #[error("{node} references undefined node: {references}")]
    UndefinedNode { node: String, references: String },

    #[error("terminal node {node} declares exit paths")]
    NotTerminalNode { node: String },

    #[error("unreachable node: {node}")]
    UnreachableNode { node: String },

    #[error("no overview documentation provided for {name}")]
    NoOverview { name: String },

    #[error("{node} has no exception policy declared")]
    NoExceptionPolicy { node: String },

    #[error("{node} exception handler is not an allowable exit: {handler}")]
    ExceptionEdgeMismatch { node: String, handler: String },
}

/// Error produced by a node body.  A body that dispatches through the
/// dependency container surfaces the capability's error unchanged; the
/// runtime converts it into a `Failure` routed to the declared
/// on-exception node.
#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Repository(#[from] crate::repository::RepositoryError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("{0}")]
    Message(String),
}

impl NodeError {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

#[cfg(test)]
mod tests {
    use super::{DefinitionError, NodeError};

    #[test]
    fn definition_errors_render_the_offending_name() {
        let error = DefinitionError::UnreachableNode {
            node: "MachineBackupDatabase.compress".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unreachable node: MachineBackupDatabase.compress"
        );
    }

    #[test]
    fn message_errors_render_bare_text() {
        let error = NodeError::message("unit test failure");
        assert_eq!(error.to_string(), "unit test failure");
    }
}
