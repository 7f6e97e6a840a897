// flowmig_engine/chain - Backward resolution of fluent builder chains
use flowmig_ast::{CallRef, Expression};
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;

/// Step names observed in a resolved builder chain, mapped to their first
/// argument each.
///
/// Only the set of present names and their arguments matter; the order the
/// chain was written in source is discarded during collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedSteps {
    args: BTreeMap<String, Expression>,
}

impl CollectedSteps {
    pub fn names(&self) -> BTreeSet<String> {
        self.args.keys().cloned().collect()
    }

    pub fn arg(&self, name: &str) -> Option<&Expression> {
        self.args.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

/// Walks a builder chain backward from its terminal commit call to the chain
/// root, collecting recognized step names and their first argument each.
///
/// The walk starts at the terminal's receiver and follows receivers until the
/// current node is no longer a call. The first occurrence of a step name wins:
/// the backward walk meets the occurrence closest to the terminal first and
/// treats it as authoritative. The root call is an ordinary chain link here,
/// so it contributes its own name and argument like any other step.
pub fn collect_steps(terminal: &CallRef<'_>, legal_steps: &BTreeSet<String>) -> CollectedSteps {
    let mut collected = CollectedSteps::default();
    let mut current = terminal.receiver;
    while let Some(expr) = current {
        let Some(call) = expr.as_call() else {
            break;
        };
        if legal_steps.contains(call.method_name) && !call.args.is_empty() {
            collected
                .args
                .entry(call.method_name.to_string())
                .or_insert_with(|| call.args[0].clone());
        }
        current = call.receiver;
    }
    trace!(
        terminal = terminal.method_name,
        steps = ?collected.names(),
        "resolved builder chain"
    );
    collected
}
