// flowmig_engine/selector - Exact-set matching of resolved chains to specs
use crate::chain::CollectedSteps;
use crate::spec::BuilderSpec;
use tracing::trace;

/// Selects the unique builder spec whose required-step-set is set-equal to
/// the observed step names. Subset or superset relations never match; zero
/// matches means the chain is left unrewritten.
pub fn select_builder_spec<'a>(
    candidates: impl IntoIterator<Item = &'a BuilderSpec>,
    collected: &CollectedSteps,
) -> Option<&'a BuilderSpec> {
    let observed = collected.names();
    let selected = candidates
        .into_iter()
        .find(|spec| spec.required_steps == observed);
    match selected {
        Some(spec) => trace!(steps = ?observed, template = spec.template.text(), "selected builder spec"),
        None => trace!(steps = ?observed, "no builder spec matches observed step set"),
    }
    selected
}
