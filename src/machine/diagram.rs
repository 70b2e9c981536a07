#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt::Write as _;

use super::definition::MachineDefinition;

/// Side-effect-free projection of a validated machine graph, consumable
/// by an external renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagram {
    pub machine: String,
    pub overview: String,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub name: String,
    pub overview: String,
    pub is_entry: bool,
    pub is_terminal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invokes_machine: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub color: EdgeColor,
}

/// Happy edges render green, unhappy edges red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeColor {
    Happy,
    Unhappy,
}

impl<M> MachineDefinition<M> {
    #[must_use]
    pub fn diagram(&self) -> Diagram {
        let nodes = self
            .nodes()
            .iter()
            .map(|node| DiagramNode {
                name: node.name.to_string(),
                overview: node.overview.to_string(),
                is_entry: node.is_entry,
                is_terminal: node.is_terminal,
                invokes_machine: node.invokes_machine.map(ToString::to_string),
            })
            .collect();

        let mut edges = Vec::new();
        for node in self.nodes() {
            for target in node.happy_paths {
                edges.push(DiagramEdge {
                    from: node.name.to_string(),
                    to: (*target).to_string(),
                    color: EdgeColor::Happy,
                });
            }
            for target in node.unhappy_paths {
                edges.push(DiagramEdge {
                    from: node.name.to_string(),
                    to: (*target).to_string(),
                    color: EdgeColor::Unhappy,
                });
            }
        }

        Diagram {
            machine: self.name().to_string(),
            overview: self.overview().to_string(),
            nodes,
            edges,
        }
    }
}

impl Diagram {
    /// Renders a mermaid `stateDiagram-v2` block: happy edges labelled
    /// success, unhappy edges labelled failure.
    #[must_use]
    pub fn to_mermaid(&self) -> String {
        let mut rendered = String::from("stateDiagram-v2\n");
        for node in self.nodes.iter().filter(|node| node.is_entry) {
            let _ = writeln!(rendered, "    [*] --> {}", node.name);
        }
        for edge in &self.edges {
            let label = match edge.color {
                EdgeColor::Happy => "success",
                EdgeColor::Unhappy => "failure",
            };
            let _ = writeln!(rendered, "    {} --> {}: {label}", edge.from, edge.to);
        }
        for node in self.nodes.iter().filter(|node| node.is_terminal) {
            let _ = writeln!(rendered, "    {} --> [*]", node.name);
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::EdgeColor;
    use crate::machine::definition::{report_results, MachineDefinition, Node};
    use crate::machine::transition::success;

    struct Probe;

    #[test]
    fn the_diagram_projects_every_declared_edge_with_its_color() {
        let definition: MachineDefinition<Probe> = MachineDefinition::new(
            "MachineProbe",
            "Probe machine.",
            vec![
                Node::new("entry", "First step.", |_| Ok(success("report_results")))
                    .entry()
                    .happy(&["report_results"])
                    .unhappy(&["cleanup"])
                    .on_exception("cleanup"),
                Node::new("cleanup", "Cleanup step.", |_| Ok(success("report_results")))
                    .happy(&["report_results"])
                    .no_exceptions(),
                report_results(),
            ],
        )
        .unwrap();

        let diagram = definition.diagram();
        assert_eq!(diagram.machine, "MachineProbe");
        assert_eq!(diagram.nodes.len(), 3);
        assert_eq!(diagram.edges.len(), 3);
        assert_eq!(
            diagram
                .edges
                .iter()
                .filter(|edge| edge.color == EdgeColor::Unhappy)
                .count(),
            1
        );

        let mermaid = diagram.to_mermaid();
        assert!(mermaid.starts_with("stateDiagram-v2\n"));
        assert!(mermaid.contains("[*] --> entry"));
        assert!(mermaid.contains("entry --> cleanup: failure"));
        assert!(mermaid.contains("report_results --> [*]"));
    }
}
