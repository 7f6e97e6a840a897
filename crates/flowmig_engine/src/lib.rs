// flowmig_engine - Rewrite rule engine for migrating legacy workflow-engine
// call sites to the asynchronous client API
//! The engine recognizes legacy call shapes on a resolved syntax tree,
//! including fluent builder chains whose optional steps may appear in any
//! order or not at all, selects the one replacement rule matching the exact
//! step set observed, synthesizes a typed replacement expression from a
//! parameterized template, and propagates type changes forward so later uses
//! of a rewritten variable are retargeted consistently.
//!
//! The rule catalog is plain data assembled by the host (see
//! [`BuilderSpecConfig`] for power-set expansion of builder rules); catalog
//! construction is the only fallible stage. A unit traversal never fails:
//! every "no rule applies" outcome leaves the node unchanged.

mod chain;
mod context;
mod engine;
mod error;
mod generator;
mod matcher;
mod precondition;
mod selector;
mod spec;
mod template;

pub use chain::{collect_steps, CollectedSteps};
pub use context::RewriteContext;
pub use engine::{any_target_applies, rewrite_unit, rewrite_unit_with_target};
pub use error::CatalogError;
pub use generator::BuilderSpecConfig;
pub use matcher::{MethodSignature, ParamSpec};
pub use precondition::{unit_body_uses_type, Precondition};
pub use selector::select_builder_spec;
pub use spec::{
    BaseIdentifier, BuilderSpec, MigrationTarget, NamedArg, ReplacementSpec, ReturnSpec,
    ReturnType, RuleCatalog, SimpleSpec, BASE_PLACEHOLDER, RECEIVER_PLACEHOLDER,
};
pub use template::{RewriteTemplate, TemplateExpr};
