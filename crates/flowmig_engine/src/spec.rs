// flowmig_engine/spec - Replacement rules and the migration catalog
use crate::error::CatalogError;
use crate::matcher::MethodSignature;
use crate::precondition::Precondition;
use crate::template::RewriteTemplate;
use flowmig_ast::{Expression, Span};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder name bound to the replacement's receiver value in every
/// simple and builder template.
pub const BASE_PLACEHOLDER: &str = "base";

/// Placeholder name bound to the retyped receiver in return-reshape templates.
pub const RECEIVER_PLACEHOLDER: &str = "receiver";

/// The identifier substituted as the new receiver of a replacement, e.g.
/// `camundaClient` of type `io.camunda.client.CamundaClient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseIdentifier {
    pub name: String,
    pub type_fqn: String,
}

impl BaseIdentifier {
    pub fn new(name: impl Into<String>, type_fqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_fqn: type_fqn.into(),
        }
    }

    pub fn to_expression(&self) -> Expression {
        Expression::Identifier {
            name: self.name.clone(),
            type_fqn: Some(self.type_fqn.clone()),
            span: Span::dummy(),
        }
    }
}

/// How the replacement's resulting type is determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnType {
    /// Use the given fully qualified name.
    Specified(String),
    /// Keep whatever the surrounding declaration or assignment already says.
    InferFromContext,
    /// No resulting type (void method or expression statement).
    Void,
}

/// Named index into a matched call's own argument list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedArg {
    pub name: String,
    pub index: usize,
}

impl NamedArg {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Replaces a single call matching one exact overload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleSpec {
    pub signature: MethodSignature,
    pub template: RewriteTemplate,
    pub base: BaseIdentifier,
    pub return_type: ReturnType,
    /// Which of the call's own arguments feed which placeholder.
    pub args: Vec<NamedArg>,
    pub comments: Vec<String>,
}

impl SimpleSpec {
    pub fn new(
        signature: MethodSignature,
        template: RewriteTemplate,
        base: BaseIdentifier,
        return_type: ReturnType,
        args: Vec<NamedArg>,
        comments: Vec<String>,
    ) -> Result<Self, CatalogError> {
        let mut declared: BTreeSet<String> =
            args.iter().map(|arg| arg.name.clone()).collect();
        declared.insert(BASE_PLACEHOLDER.to_string());
        template.check_placeholders(&declared)?;
        Ok(Self {
            signature,
            template,
            base,
            return_type,
            args,
            comments,
        })
    }
}

/// Replaces a whole builder chain whose observed step set equals
/// `required_steps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderSpec {
    /// Signature of the terminal commit call.
    pub commit: MethodSignature,
    /// Exact set of step names this spec expects in a resolved chain.
    pub required_steps: BTreeSet<String>,
    /// The extractable subset, in catalog declaration order. Each entry names
    /// a template placeholder fed from the collected step argument.
    pub extracted_params: Vec<String>,
    pub template: RewriteTemplate,
    pub base: BaseIdentifier,
    pub return_type: ReturnType,
    pub comments: Vec<String>,
}

impl BuilderSpec {
    pub fn new(
        commit: MethodSignature,
        required_steps: BTreeSet<String>,
        extracted_params: Vec<String>,
        template: RewriteTemplate,
        base: BaseIdentifier,
        return_type: ReturnType,
        comments: Vec<String>,
    ) -> Result<Self, CatalogError> {
        for name in &extracted_params {
            if !required_steps.contains(name) {
                return Err(CatalogError::ExtractedParameterOutsideSteps {
                    name: name.clone(),
                    steps: required_steps.iter().cloned().collect(),
                });
            }
        }
        let mut declared: BTreeSet<String> = extracted_params.iter().cloned().collect();
        declared.insert(BASE_PLACEHOLDER.to_string());
        template.check_placeholders(&declared)?;
        Ok(Self {
            commit,
            required_steps,
            extracted_params,
            template,
            base,
            return_type,
            comments,
        })
    }
}

/// Reshapes a return-value expression, e.g. retyping an accessor read of a
/// rewritten variable. No argument extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSpec {
    pub signature: MethodSignature,
    pub template: RewriteTemplate,
}

impl ReturnSpec {
    pub fn new(
        signature: MethodSignature,
        template: RewriteTemplate,
    ) -> Result<Self, CatalogError> {
        let declared: BTreeSet<String> =
            std::iter::once(RECEIVER_PLACEHOLDER.to_string()).collect();
        template.check_placeholders(&declared)?;
        Ok(Self {
            signature,
            template,
        })
    }
}

/// One replacement rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReplacementSpec {
    Simple(SimpleSpec),
    Builder(BuilderSpec),
    Return(ReturnSpec),
}

/// All rules for one migration target, gated by a shared precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationTarget {
    pub name: String,
    pub preconditions: Precondition,
    pub specs: Vec<ReplacementSpec>,
}

impl MigrationTarget {
    /// Validates the spec list: no two builder specs for the same commit
    /// method may share a required-step-set.
    pub fn new(
        name: impl Into<String>,
        preconditions: Precondition,
        specs: Vec<ReplacementSpec>,
    ) -> Result<Self, CatalogError> {
        let mut seen: BTreeSet<(String, Vec<String>)> = BTreeSet::new();
        for spec in &specs {
            if let ReplacementSpec::Builder(builder) = spec {
                let key = (
                    builder.commit.method_name.clone(),
                    builder.required_steps.iter().cloned().collect::<Vec<_>>(),
                );
                if !seen.insert(key.clone()) {
                    return Err(CatalogError::DuplicateStepSet {
                        method: key.0,
                        steps: key.1,
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            preconditions,
            specs,
        })
    }

    pub fn simple_specs(&self) -> impl Iterator<Item = &SimpleSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            ReplacementSpec::Simple(simple) => Some(simple),
            _ => None,
        })
    }

    pub fn builder_specs(&self) -> impl Iterator<Item = &BuilderSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            ReplacementSpec::Builder(builder) => Some(builder),
            _ => None,
        })
    }

    pub fn return_specs(&self) -> impl Iterator<Item = &ReturnSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            ReplacementSpec::Return(ret) => Some(ret),
            _ => None,
        })
    }
}

/// The immutable rule catalog, built once and shared read-only across unit
/// traversals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub targets: Vec<MigrationTarget>,
}

impl RuleCatalog {
    pub fn new(targets: Vec<MigrationTarget>) -> Self {
        Self { targets }
    }
}
