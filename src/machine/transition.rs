#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use super::result::StepResult;

/// The enriched transition consumed by the runtime: the result emitted by
/// the node that just ran, plus the next node to execute.  `exit_to = None`
/// is the terminal exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub result: StepResult,
    pub exit_to: Option<&'static str>,
}

/// The value a node body returns.  The runtime attaches the qualified node
/// identity and the machine's failure prefix when it turns this into a
/// [`Transition`].
#[derive(Debug)]
pub enum NextStep {
    Success {
        exit_to: &'static str,
    },
    Failure {
        exit_to: &'static str,
        message: String,
    },
    /// A nested machine ran to completion; its result stream is spliced
    /// into the invoking machine's stream ahead of this node's own result.
    Invoked {
        results: Vec<StepResult>,
        exit_to: &'static str,
    },
    Exit,
}

/// Successful transition to *exit_to*.
#[must_use]
pub const fn success(exit_to: &'static str) -> NextStep {
    NextStep::Success { exit_to }
}

/// Failing transition to *exit_to*.  The machine's failure prefix is
/// prepended to *message* by the runtime.
pub fn failure(exit_to: &'static str, message: impl Into<String>) -> NextStep {
    NextStep::Failure {
        exit_to,
        message: message.into(),
    }
}

/// Transition to *exit_to* after running one or more nested machines,
/// splicing their combined result stream into the invoking stream.
#[must_use]
pub const fn invoked(results: Vec<StepResult>, exit_to: &'static str) -> NextStep {
    NextStep::Invoked { results, exit_to }
}

/// Terminal exit from the machine.
#[must_use]
pub const fn exit() -> NextStep {
    NextStep::Exit
}
