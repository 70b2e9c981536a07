#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::time::Instant;

use tracing::{debug, error};

use super::definition::{MachineDefinition, Node, OnException};
use super::error::DefinitionError;
use super::result::StepResult;
use super::transition::{NextStep, Transition};

/// The machine authoring contract: a lazily-validated definition plus the
/// per-run failure prefix.  State and dependency records are plain fields
/// of the implementing struct, read and written by the node bodies.
pub trait Machine: Sized {
    fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError>;

    /// Context prepended to every failure message this run emits.
    fn failure_prefix(&self) -> String;
}

/// A node's step after edge checking: the enriched transition plus any
/// nested-machine results to splice in ahead of the node's own result.
struct Resolved {
    transition: Transition,
    spliced: Vec<StepResult>,
}

/// Executes a machine from its entry node to a terminal exit and returns
/// the ordered result stream, one entry per node that ran.
///
/// Domain errors never cross a node boundary: a failing body on a
/// may-throw node becomes a `Failure` routed to its declared handler, and
/// an edge-check violation is appended to the stream as a `Failure` that
/// aborts the machine.
///
/// # Errors
/// Returns the [`DefinitionError`] if the machine definition itself never
/// validated.
pub fn execute<M: Machine + 'static>(machine: &mut M) -> Result<Vec<StepResult>, DefinitionError> {
    let definition = M::definition().as_ref().map_err(Clone::clone)?;
    let machine_started = Instant::now();
    debug!("{} started", definition.name());

    let mut results: Vec<StepResult> = Vec::new();
    let mut current = definition.entry();

    loop {
        let qualified = definition.qualified(current.name);
        let node_started = Instant::now();
        debug!("{qualified} started");

        let step = match (current.body)(machine) {
            Ok(step) => step,
            Err(cause) => match current.on_exception {
                Some(OnException::ExitTo(handler)) => {
                    error!("{qualified} {} {cause}", machine.failure_prefix());
                    NextStep::Failure {
                        exit_to: handler,
                        message: format!("unrecognized exception: {cause}"),
                    }
                }
                _ => {
                    // A node that asserted it cannot fail did.  Defect:
                    // abort the whole machine.
                    error!("{qualified} declared no exceptions but failed: {cause}");
                    results.push(StepResult::failure(
                        &qualified,
                        format!(
                            "{} programming error: node declared no exceptions but failed: {cause}",
                            machine.failure_prefix()
                        ),
                    ));
                    return Ok(results);
                }
            },
        };
        debug!(
            "{qualified} completed runtime: {:?}",
            node_started.elapsed()
        );

        let resolved = match check_edges(definition, current, &qualified, machine, step) {
            Ok(resolved) => resolved,
            Err(abort) => {
                error!("{abort}");
                results.push(StepResult::failure(&qualified, abort));
                return Ok(results);
            }
        };

        results.extend(resolved.spliced);

        match resolved.transition.exit_to {
            None => {
                // Terminal exit: the synthesized result carries the
                // accumulated stream as its payload.
                let payload = serde_json::to_value(&results).ok();
                match resolved.transition.result {
                    StepResult::Success { node, .. } => {
                        results.push(StepResult::Success { node, payload });
                    }
                    failure @ StepResult::Failure { .. } => results.push(failure),
                }
                break;
            }
            Some(next) => {
                results.push(resolved.transition.result);
                // The target resolved during the edge check.
                match definition.node(next) {
                    Some(node) => current = node,
                    None => break,
                }
            }
        }
    }

    debug!(
        "{} completed runtime: {:?}",
        definition.name(),
        machine_started.elapsed()
    );

    Ok(results)
}

/// Applies the declared-edge rules to the step a node returned and builds
/// the enriched transition.  A violation yields the abort message.
fn check_edges<M: Machine>(
    definition: &MachineDefinition<M>,
    current: &Node<M>,
    qualified: &str,
    machine: &M,
    step: NextStep,
) -> Result<Resolved, String> {
    let prefix = machine.failure_prefix();

    match step {
        NextStep::Exit => {
            if current.is_terminal {
                Ok(Resolved {
                    transition: Transition {
                        result: StepResult::success(qualified),
                        exit_to: None,
                    },
                    spliced: Vec::new(),
                })
            } else {
                Err(format!(
                    "{prefix} illegal transition: {qualified} exited but is not a terminal node"
                ))
            }
        }
        NextStep::Success { exit_to } => {
            check_target(definition, current, qualified, &prefix, exit_to, true)?;
            Ok(Resolved {
                transition: Transition {
                    result: StepResult::success(qualified),
                    exit_to: Some(exit_to),
                },
                spliced: Vec::new(),
            })
        }
        NextStep::Invoked { results, exit_to } => {
            check_target(definition, current, qualified, &prefix, exit_to, true)?;
            Ok(Resolved {
                transition: Transition {
                    result: StepResult::success(qualified),
                    exit_to: Some(exit_to),
                },
                spliced: results,
            })
        }
        NextStep::Failure { exit_to, message } => {
            check_target(definition, current, qualified, &prefix, exit_to, false)?;
            Ok(Resolved {
                transition: Transition {
                    result: StepResult::failure(qualified, format!("{prefix} {message}")),
                    exit_to: Some(exit_to),
                },
                spliced: Vec::new(),
            })
        }
    }
}

fn check_target<M>(
    definition: &MachineDefinition<M>,
    current: &Node<M>,
    qualified: &str,
    prefix: &str,
    target: &'static str,
    is_success: bool,
) -> Result<(), String> {
    if definition.node(target).is_none() {
        return Err(format!(
            "{prefix} illegal transition: {qualified} cannot transition to {target}"
        ));
    }
    if target == current.name {
        return Err(format!(
            "{prefix} no transition: {qualified} returned a transition to itself"
        ));
    }
    let declared = if is_success {
        current.happy_paths
    } else {
        current.unhappy_paths
    };
    if !declared.contains(&target) {
        let direction = if is_success {
            "routed a success down an unhappy path"
        } else {
            "routed a failure down a happy path"
        };
        return Err(format!(
            "{prefix} illegal transition: {qualified} {direction} to {target}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{execute, Machine};
    use crate::machine::definition::{report_results, MachineDefinition, Node};
    use crate::machine::error::{DefinitionError, NodeError};
    use crate::machine::transition::{failure, invoked, success};
    use crate::machine::StepResult;
    use std::sync::LazyLock;

    /// A four-node probe machine mirroring the smallest realistic graph:
    /// entry -> happy -> happier(terminal), with a shared unhappy node.
    struct MachineProbe {
        fail_at_happy: bool,
        raise_at_entry: bool,
    }

    static PROBE_DEFINITION: LazyLock<Result<MachineDefinition<MachineProbe>, DefinitionError>> =
        LazyLock::new(|| {
            MachineDefinition::new(
                "MachineProbe",
                "Exercises the run loop.",
                vec![
                    Node::new("entry", "First step.", |machine: &mut MachineProbe| {
                        if machine.raise_at_entry {
                            return Err(NodeError::message("unit test failure"));
                        }
                        Ok(success("happy"))
                    })
                    .entry()
                    .happy(&["happy"])
                    .unhappy(&["unhappy"])
                    .on_exception("unhappy"),
                    Node::new("happy", "Second step.", |machine: &mut MachineProbe| {
                        if machine.fail_at_happy {
                            return Ok(failure("unhappy", "uh oh"));
                        }
                        Ok(success("happier"))
                    })
                    .happy(&["happier"])
                    .unhappy(&["unhappy"])
                    .no_exceptions(),
                    Node::new("happier", "Terminal step.", |_| {
                        Ok(crate::machine::transition::exit())
                    })
                    .terminal()
                    .no_exceptions(),
                    Node::new("unhappy", "Cleanup step.", |_| Ok(success("report_results")))
                        .happy(&["report_results"])
                        .no_exceptions(),
                    report_results(),
                ],
            )
        });

    impl Machine for MachineProbe {
        fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
            &PROBE_DEFINITION
        }

        fn failure_prefix(&self) -> String {
            "MachineProbe".to_string()
        }
    }

    #[test]
    fn the_happy_path_emits_a_success_per_node() {
        let mut machine = MachineProbe {
            fail_at_happy: false,
            raise_at_entry: false,
        };
        let results = execute(&mut machine).unwrap();

        let nodes: Vec<&str> = results.iter().map(StepResult::node).collect();
        assert_eq!(
            nodes,
            vec!["MachineProbe.entry", "MachineProbe.happy", "MachineProbe.happier"]
        );
        assert!(results.iter().all(StepResult::is_success));
    }

    #[test]
    fn a_domain_failure_travels_the_unhappy_path_with_the_prefix() {
        let mut machine = MachineProbe {
            fail_at_happy: true,
            raise_at_entry: false,
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 4);
        assert!(results[0].is_success());
        assert!(results[1].is_failure());
        assert_eq!(results[1].node(), "MachineProbe.happy");
        assert_eq!(results[1].message(), Some("MachineProbe uh oh"));
        assert_eq!(results[2].node(), "MachineProbe.unhappy");
        assert_eq!(results[3].node(), "MachineProbe.report_results");
    }

    #[test]
    fn a_raised_error_converts_to_a_failure_on_the_exception_edge() {
        let mut machine = MachineProbe {
            fail_at_happy: false,
            raise_at_entry: true,
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].node(), "MachineProbe.entry");
        assert_eq!(
            results[0].message(),
            Some("MachineProbe unrecognized exception: unit test failure")
        );
        assert!(results[1].is_success());
        assert_eq!(results[2].node(), "MachineProbe.report_results");
    }

    #[test]
    fn the_terminal_result_carries_the_stream_as_payload() {
        let mut machine = MachineProbe {
            fail_at_happy: false,
            raise_at_entry: false,
        };
        let results = execute(&mut machine).unwrap();
        let last = results.last().unwrap();
        match last {
            StepResult::Success { payload: Some(payload), .. } => {
                let entries = payload.as_array().unwrap();
                assert_eq!(entries.len(), results.len() - 1);
            }
            other => panic!("expected payload-bearing terminal result: {other:?}"),
        }
    }

    /// A machine whose single internal node misbehaves on demand to
    /// exercise the runtime edge checks.
    struct MachineDefect {
        step: fn() -> crate::machine::transition::NextStep,
    }

    static DEFECT_DEFINITION: LazyLock<Result<MachineDefinition<MachineDefect>, DefinitionError>> =
        LazyLock::new(|| {
            MachineDefinition::new(
                "MachineDefect",
                "Exercises runtime edge checks.",
                vec![
                    Node::new("entry", "Misbehaving step.", |machine: &mut MachineDefect| {
                        Ok((machine.step)())
                    })
                    .entry()
                    .happy(&["settle"])
                    .unhappy(&["cleanup"])
                    .no_exceptions(),
                    Node::new("settle", "Well-behaved step.", |_| {
                        Ok(success("report_results"))
                    })
                    .happy(&["report_results"])
                    .no_exceptions(),
                    Node::new("cleanup", "Cleanup step.", |_| Ok(success("report_results")))
                        .happy(&["report_results"])
                        .no_exceptions(),
                    report_results(),
                ],
            )
        });

    impl Machine for MachineDefect {
        fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
            &DEFECT_DEFINITION
        }

        fn failure_prefix(&self) -> String {
            "MachineDefect".to_string()
        }
    }

    #[test]
    fn a_success_down_an_unhappy_path_aborts_the_machine() {
        let mut machine = MachineDefect {
            step: || success("cleanup"),
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 1);
        let message = results[0].message().unwrap();
        assert!(message.contains("illegal transition"), "{message}");
        assert!(message.contains("routed a success down an unhappy path"));
    }

    #[test]
    fn a_failure_down_a_happy_path_aborts_the_machine() {
        let mut machine = MachineDefect {
            step: || failure("settle", "uh oh"),
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 1);
        let message = results[0].message().unwrap();
        assert!(message.contains("illegal transition"), "{message}");
        assert!(message.contains("routed a failure down a happy path"));
    }

    #[test]
    fn a_transition_to_an_undeclared_node_aborts_the_machine() {
        let mut machine = MachineDefect {
            step: || success("nowhere"),
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0]
            .message()
            .unwrap()
            .contains("cannot transition to nowhere"));
    }

    #[test]
    fn a_self_transition_aborts_with_no_transition() {
        let mut machine = MachineDefect {
            step: || success("entry"),
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].message().unwrap().contains("no transition"));
    }

    #[test]
    fn an_exit_from_a_non_terminal_node_aborts_the_machine() {
        let mut machine = MachineDefect {
            step: crate::machine::transition::exit,
        };
        let results = execute(&mut machine).unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0]
            .message()
            .unwrap()
            .contains("exited but is not a terminal node"));
    }

    /// A machine whose entry splices a canned nested stream, as an
    /// invoking node does after running a sub-machine.
    struct MachineOuter;

    static OUTER_DEFINITION: LazyLock<Result<MachineDefinition<MachineOuter>, DefinitionError>> =
        LazyLock::new(|| {
            MachineDefinition::new(
                "MachineOuter",
                "Exercises nested result splicing.",
                vec![
                    Node::new("run_inner", "Runs the nested machine.", |_| {
                        Ok(invoked(
                            vec![
                                StepResult::success("MachineInner.first"),
                                StepResult::success("MachineInner.second"),
                                StepResult::failure("MachineInner.third", "inner uh oh"),
                            ],
                            "report_results",
                        ))
                    })
                    .entry()
                    .invokes("MachineInner")
                    .happy(&["report_results"])
                    .no_exceptions(),
                    report_results(),
                ],
            )
        });

    impl Machine for MachineOuter {
        fn definition() -> &'static Result<MachineDefinition<Self>, DefinitionError> {
            &OUTER_DEFINITION
        }

        fn failure_prefix(&self) -> String {
            "MachineOuter".to_string()
        }
    }

    #[test]
    fn nested_results_are_spliced_ahead_of_the_invoking_node() {
        let mut machine = MachineOuter;
        let results = execute(&mut machine).unwrap();

        let nodes: Vec<&str> = results.iter().map(StepResult::node).collect();
        assert_eq!(
            nodes,
            vec![
                "MachineInner.first",
                "MachineInner.second",
                "MachineInner.third",
                "MachineOuter.run_inner",
                "MachineOuter.report_results",
            ]
        );
        // A nested failure does not turn the invoking node unhappy.
        assert!(results[2].is_failure());
        assert!(results[3].is_success());
        assert_eq!(results.iter().filter(|r| r.is_failure()).count(), 1);
    }
}
