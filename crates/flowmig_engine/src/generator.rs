// flowmig_engine/generator - Power-set expansion of builder replacement specs
use crate::error::CatalogError;
use crate::matcher::MethodSignature;
use crate::spec::{BaseIdentifier, BuilderSpec, ReturnType};
use crate::template::RewriteTemplate;
use std::collections::BTreeSet;

/// Configuration for one builder-chain migration: a mandatory step, the
/// optional steps that may appear in any order or not at all, and how each
/// extractable step maps into the replacement template.
#[derive(Debug, Clone)]
pub struct BuilderSpecConfig {
    /// Signature of the terminal commit call.
    pub commit: MethodSignature,
    /// The step every legal chain contains, typically the chain's root call.
    pub mandatory_step: String,
    /// Optional steps in catalog declaration order.
    pub optional_steps: Vec<String>,
    /// Step name -> template fragment, in catalog declaration order. Steps
    /// declared legal but absent here contribute a removal comment instead of
    /// a fragment.
    pub extractable: Vec<(String, String)>,
    /// Fixed template text placed before the step fragments. Must contain
    /// the `#{base}` receiver placeholder.
    pub prefix: String,
    /// Fixed template text placed after the step fragments.
    pub suffix: String,
    pub base: BaseIdentifier,
    pub return_type: ReturnType,
    pub extra_comments: Vec<String>,
}

impl BuilderSpecConfig {
    /// Expands the configuration into exactly `2^N` builder specs, one per
    /// subset of the optional steps (the mandatory step is included in every
    /// subset).
    ///
    /// Template text is assembled in the fixed declaration order of
    /// `extractable`, never in subset iteration order and never in chain
    /// source order, so generated templates are reproducible.
    pub fn expand(&self) -> Result<Vec<BuilderSpec>, CatalogError> {
        let n = self.optional_steps.len();
        let extractable_names: BTreeSet<&str> = self
            .extractable
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        let mut specs = Vec::with_capacity(1 << n);
        for mask in 0u64..(1u64 << n) {
            let mut combo = vec![self.mandatory_step.clone()];
            for (bit, step) in self.optional_steps.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    combo.push(step.clone());
                }
            }
            let required_steps: BTreeSet<String> = combo.iter().cloned().collect();

            let mut text = self.prefix.clone();
            let mut extracted_params = Vec::new();
            for (name, fragment) in &self.extractable {
                if required_steps.contains(name) {
                    text.push_str(fragment);
                    extracted_params.push(name.clone());
                }
            }
            text.push_str(&self.suffix);

            let comments: Vec<String> = combo
                .iter()
                .filter(|name| !extractable_names.contains(name.as_str()))
                .map(|name| format!(" {} was removed", name))
                .chain(self.extra_comments.iter().cloned())
                .collect();

            specs.push(BuilderSpec::new(
                self.commit.clone(),
                required_steps,
                extracted_params,
                RewriteTemplate::parse(&text)?,
                self.base.clone(),
                self.return_type.clone(),
                comments,
            )?);
        }
        Ok(specs)
    }
}
