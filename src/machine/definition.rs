#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::collections::{HashMap, VecDeque};
use std::fmt;

use super::error::{DefinitionError, NodeError};
use super::transition::{exit, NextStep};

/// Exception policy declared on every node: either the name of the node a
/// raised error routes to, or an assertion that the body cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnException {
    ExitTo(&'static str),
    Never,
}

pub type NodeBody<M> = fn(&mut M) -> Result<NextStep, NodeError>;

/// A single addressable step of a machine.  Immutable once the owning
/// [`MachineDefinition`] has validated.
pub struct Node<M> {
    pub name: &'static str,
    pub overview: &'static str,
    pub is_entry: bool,
    pub is_terminal: bool,
    pub happy_paths: &'static [&'static str],
    pub unhappy_paths: &'static [&'static str],
    pub invokes_machine: Option<&'static str>,
    pub on_exception: Option<OnException>,
    pub body: NodeBody<M>,
}

impl<M> Node<M> {
    pub const fn new(name: &'static str, overview: &'static str, body: NodeBody<M>) -> Self {
        Self {
            name,
            overview,
            is_entry: false,
            is_terminal: false,
            happy_paths: &[],
            unhappy_paths: &[],
            invokes_machine: None,
            on_exception: None,
            body,
        }
    }

    #[must_use]
    pub const fn entry(mut self) -> Self {
        self.is_entry = true;
        self
    }

    #[must_use]
    pub const fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    #[must_use]
    pub const fn happy(mut self, paths: &'static [&'static str]) -> Self {
        self.happy_paths = paths;
        self
    }

    #[must_use]
    pub const fn unhappy(mut self, paths: &'static [&'static str]) -> Self {
        self.unhappy_paths = paths;
        self
    }

    #[must_use]
    pub const fn invokes(mut self, machine: &'static str) -> Self {
        self.invokes_machine = Some(machine);
        self
    }

    /// The body may fail; errors route to *handler*, which must be one of
    /// the node's unhappy paths.
    #[must_use]
    pub const fn on_exception(mut self, handler: &'static str) -> Self {
        self.on_exception = Some(OnException::ExitTo(handler));
        self
    }

    /// Asserts the body cannot fail.  A `no_exceptions` node that does
    /// fail aborts the whole machine as a programming error.
    #[must_use]
    pub const fn no_exceptions(mut self) -> Self {
        self.on_exception = Some(OnException::Never);
        self
    }

    fn exits(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.happy_paths
            .iter()
            .chain(self.unhappy_paths.iter())
            .copied()
    }
}

impl<M> fmt::Debug for Node<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("is_entry", &self.is_entry)
            .field("is_terminal", &self.is_terminal)
            .field("happy_paths", &self.happy_paths)
            .field("unhappy_paths", &self.unhappy_paths)
            .field("invokes_machine", &self.invokes_machine)
            .field("on_exception", &self.on_exception)
            .finish_non_exhaustive()
    }
}

/// The conventional terminal node shared by every machine: emits the
/// final exit carrying the accumulated result stream.
#[must_use]
pub fn report_results<M>() -> Node<M> {
    Node::new(
        "report_results",
        "Report the success and failure outcomes back to the caller.",
        |_machine| Ok(exit()),
    )
    .terminal()
    .no_exceptions()
}

/// A validated, immutable machine graph.
pub struct MachineDefinition<M> {
    name: &'static str,
    overview: &'static str,
    nodes: Vec<Node<M>>,
    index: HashMap<&'static str, usize>,
    entry: usize,
}

impl<M> MachineDefinition<M> {
    /// Builds the definition and runs the full load-time validation.
    ///
    /// # Errors
    /// Returns the [`DefinitionError`] kind matching the first violated
    /// graph invariant.
    pub fn new(
        name: &'static str,
        overview: &'static str,
        nodes: Vec<Node<M>>,
    ) -> Result<Self, DefinitionError> {
        if overview.trim().is_empty() {
            return Err(DefinitionError::NoOverview {
                name: name.to_string(),
            });
        }

        let mut index = HashMap::new();
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.name, position).is_some() {
                return Err(DefinitionError::DuplicateNode {
                    node: format!("{name}.{}", node.name),
                });
            }
            if node.overview.trim().is_empty() {
                return Err(DefinitionError::NoOverview {
                    name: format!("{name}.{}", node.name),
                });
            }
        }

        let entries: Vec<&'static str> = nodes
            .iter()
            .filter(|node| node.is_entry)
            .map(|node| node.name)
            .collect();
        let entry = match entries.as_slice() {
            [] => {
                return Err(DefinitionError::NoEntryNode {
                    machine: name.to_string(),
                })
            }
            [only] => index[only],
            _ => {
                return Err(DefinitionError::MultipleEntryNodes {
                    machine: name.to_string(),
                    nodes: entries.iter().map(ToString::to_string).collect(),
                })
            }
        };

        if !nodes.iter().any(|node| node.is_terminal) {
            return Err(DefinitionError::NoTerminalNode {
                machine: name.to_string(),
            });
        }

        for node in &nodes {
            for target in node.exits() {
                if !index.contains_key(target) {
                    return Err(DefinitionError::UndefinedNode {
                        node: format!("{name}.{}", node.name),
                        references: target.to_string(),
                    });
                }
            }
            if node.is_terminal && node.exits().next().is_some() {
                return Err(DefinitionError::NotTerminalNode {
                    node: format!("{name}.{}", node.name),
                });
            }
        }

        for node in &nodes {
            match node.on_exception {
                None => {
                    return Err(DefinitionError::NoExceptionPolicy {
                        node: format!("{name}.{}", node.name),
                    })
                }
                Some(OnException::ExitTo(handler)) => {
                    if !index.contains_key(handler) || !node.unhappy_paths.contains(&handler) {
                        return Err(DefinitionError::ExceptionEdgeMismatch {
                            node: format!("{name}.{}", node.name),
                            handler: handler.to_string(),
                        });
                    }
                }
                Some(OnException::Never) => {}
            }
        }

        // Reachability: breadth-first from the entry node over both edge
        // colors must cover every node.
        let mut visited = vec![false; nodes.len()];
        let mut queue = VecDeque::from([entry]);
        visited[entry] = true;
        while let Some(position) = queue.pop_front() {
            for target in nodes[position].exits() {
                let next = index[target];
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
        if let Some(unreached) = nodes
            .iter()
            .enumerate()
            .find(|(position, _)| !visited[*position])
        {
            return Err(DefinitionError::UnreachableNode {
                node: format!("{name}.{}", unreached.1.name),
            });
        }

        Ok(Self {
            name,
            overview,
            nodes,
            index,
            entry,
        })
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn overview(&self) -> &'static str {
        self.overview
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node<M>] {
        &self.nodes
    }

    #[must_use]
    pub fn entry(&self) -> &Node<M> {
        &self.nodes[self.entry]
    }

    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node<M>> {
        self.index.get(name).map(|position| &self.nodes[*position])
    }

    /// Qualifies a step name with the machine name.
    #[must_use]
    pub fn qualified(&self, node: &str) -> String {
        format!("{}.{node}", self.name)
    }
}

impl<M> fmt::Debug for MachineDefinition<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("name", &self.name)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}
