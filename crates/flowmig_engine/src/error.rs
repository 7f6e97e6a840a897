use thiserror::Error;

/// Errors raised while constructing a rule catalog.
///
/// Catalog construction is the only fallible stage. Per-node rewriting during
/// a unit traversal never errors; every "no rule applies" outcome degrades to
/// leaving the node unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("template `{template}` failed to parse: {detail}")]
    TemplateParse { template: String, detail: String },

    #[error(
        "template `{template}` placeholders disagree with declared names \
         (missing {missing:?}, unexpected {unexpected:?})"
    )]
    PlaceholderMismatch {
        template: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("extracted parameter `{name}` is not part of the required step set {steps:?}")]
    ExtractedParameterOutsideSteps { name: String, steps: Vec<String> },

    #[error("duplicate required-step-set {steps:?} for commit method `{method}`")]
    DuplicateStepSet { method: String, steps: Vec<String> },
}
