#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod definition;
pub mod diagram;
pub mod error;
pub mod executor;
pub mod result;
pub mod transition;

pub use definition::{report_results, MachineDefinition, Node, NodeBody, OnException};
pub use diagram::{Diagram, DiagramEdge, DiagramNode, EdgeColor};
pub use error::{DefinitionError, NodeError};
pub use executor::{execute, Machine};
pub use result::StepResult;
pub use transition::{exit, failure, invoked, success, NextStep, Transition};
