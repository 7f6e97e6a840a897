// flowmig_engine/engine - Single forward rewrite pass over one unit
use crate::chain::{collect_steps, CollectedSteps};
use crate::context::RewriteContext;
use crate::selector::select_builder_spec;
use crate::spec::{
    BuilderSpec, MigrationTarget, ReturnType, RuleCatalog, SimpleSpec, BASE_PLACEHOLDER,
    RECEIVER_PLACEHOLDER,
};
use flowmig_ast::{
    AdvisoryComment, CallRef, CompilationUnit, Expression, Span, Statement,
};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Applies every target of the catalog to the unit, one gated traversal per
/// target. The catalog is read-only; all mutable state lives in a
/// per-traversal [`RewriteContext`].
pub fn rewrite_unit(mut unit: CompilationUnit, catalog: &RuleCatalog) -> CompilationUnit {
    for target in &catalog.targets {
        unit = rewrite_unit_with_target(unit, target);
    }
    unit
}

/// One single-threaded, depth-first pass for one migration target.
pub fn rewrite_unit_with_target(
    mut unit: CompilationUnit,
    target: &MigrationTarget,
) -> CompilationUnit {
    if !target.preconditions.holds(&unit) {
        debug!(rule = %target.name, "preconditions not met, skipping traversal");
        return unit;
    }
    debug!(rule = %target.name, "rewriting unit");

    let mut ctx = RewriteContext::for_unit(&unit);
    let statements = std::mem::take(&mut unit.statements);
    unit.statements = statements
        .into_iter()
        .map(|stmt| rewrite_statement(stmt, target, &mut ctx))
        .collect();
    ctx.apply_import_intents(&mut unit);
    unit
}

/// A call-shaped match: either a single overload or a fully resolved builder
/// chain with its collected steps.
enum MatchedSpec<'a> {
    Simple(&'a SimpleSpec),
    Builder(&'a BuilderSpec, CollectedSteps),
}

fn match_invocation<'a>(
    call: &CallRef<'_>,
    target: &'a MigrationTarget,
) -> Option<MatchedSpec<'a>> {
    for simple in target.simple_specs() {
        if simple.signature.matches(call) {
            return Some(MatchedSpec::Simple(simple));
        }
    }

    let group: Vec<&BuilderSpec> = target
        .builder_specs()
        .filter(|spec| spec.commit.matches(call))
        .collect();
    if !group.is_empty() {
        // The legal step vocabulary of this commit call is the union of all
        // candidate required-step-sets; unrecognized names stay opaque.
        let legal = group
            .iter()
            .flat_map(|spec| spec.required_steps.iter().cloned())
            .collect();
        let collected = collect_steps(call, &legal);
        if let Some(spec) = select_builder_spec(group, &collected) {
            return Some(MatchedSpec::Builder(spec, collected));
        }
    }
    None
}

fn synthesize_simple(
    call: &CallRef<'_>,
    spec: &SimpleSpec,
    ctx: &mut RewriteContext,
) -> Option<Expression> {
    let mut bindings = BTreeMap::new();
    bindings.insert(BASE_PLACEHOLDER.to_string(), spec.base.to_expression());
    for named in &spec.args {
        bindings.insert(named.name.clone(), call.args.get(named.index)?.clone());
    }
    spec.template.instantiate(&bindings, ctx.fresh_ids())
}

fn synthesize_builder(
    spec: &BuilderSpec,
    collected: &CollectedSteps,
    ctx: &mut RewriteContext,
) -> Option<Expression> {
    let mut bindings = BTreeMap::new();
    bindings.insert(BASE_PLACEHOLDER.to_string(), spec.base.to_expression());
    for name in &spec.extracted_params {
        bindings.insert(name.clone(), collected.arg(name)?.clone());
    }
    spec.template.instantiate(&bindings, ctx.fresh_ids())
}

fn advisory_comments(texts: &[String]) -> Vec<AdvisoryComment> {
    texts.iter().map(AdvisoryComment::new).collect()
}

/// Declaring type of the resolved call the chain bottoms out at. Replacing a
/// chain removes that root call too, so its type becomes a removal candidate.
fn chain_root_declaring_type(terminal: &CallRef<'_>) -> Option<String> {
    let mut current = terminal.receiver;
    let mut root_type = None;
    while let Some(expr) = current {
        let Some(call) = expr.as_call() else {
            break;
        };
        if let Some(resolution) = call.resolved {
            root_type = Some(resolution.declaring_type.clone());
        }
        current = call.receiver;
    }
    root_type
}

fn rewrite_statement(
    stmt: Statement,
    target: &MigrationTarget,
    ctx: &mut RewriteContext,
) -> Statement {
    match stmt {
        Statement::Block { statements, span } => {
            ctx.enter_scope();
            let statements = statements
                .into_iter()
                .map(|stmt| rewrite_statement(stmt, target, ctx))
                .collect();
            ctx.exit_scope();
            Statement::Block { statements, span }
        }
        Statement::Expression {
            expr,
            mut comments,
            span,
        } => {
            let expr = rewrite_expression(expr, target, ctx, &mut comments);
            Statement::Expression {
                expr,
                comments,
                span,
            }
        }
        Statement::VarDeclaration {
            id,
            name,
            mut type_fqn,
            initializer,
            mut comments,
            span,
        } => {
            if let Some(init) = &initializer {
                if let Some(call) = init.as_call() {
                    if let Some(matched) = match_invocation(&call, target) {
                        let (return_type, spec_comments) = match &matched {
                            MatchedSpec::Simple(spec) => (&spec.return_type, &spec.comments),
                            MatchedSpec::Builder(spec, _) => (&spec.return_type, &spec.comments),
                        };
                        if let ReturnType::Specified(new_fqn) = return_type {
                            if type_fqn.as_deref() != Some(new_fqn.as_str()) {
                                trace!(variable = %name, new_type = %new_fqn, "retyping declaration");
                                if let Some(old_fqn) = &type_fqn {
                                    ctx.remove_import(old_fqn.clone());
                                }
                                ctx.add_import(new_fqn.clone());
                                // Recorded before recursing into the rewritten
                                // initializer so later reads see the new type.
                                ctx.record_variable(name.clone(), new_fqn.clone());
                                if ctx.claim_comments(call.id) {
                                    comments.extend(advisory_comments(spec_comments));
                                }
                                type_fqn = Some(new_fqn.clone());
                            }
                        }
                    }
                }
            }
            let initializer =
                initializer.map(|init| rewrite_expression(init, target, ctx, &mut comments));
            Statement::VarDeclaration {
                id,
                name,
                type_fqn,
                initializer,
                comments,
                span,
            }
        }
    }
}

fn rewrite_expression(
    expr: Expression,
    target: &MigrationTarget,
    ctx: &mut RewriteContext,
    comments: &mut Vec<AdvisoryComment>,
) -> Expression {
    if let Some(call) = expr.as_call() {
        match match_invocation(&call, target) {
            Some(MatchedSpec::Simple(spec)) => {
                if let Some(replacement) = synthesize_simple(&call, spec, ctx) {
                    if ctx.claim_comments(call.id) {
                        comments.extend(advisory_comments(&spec.comments));
                    }
                    ctx.add_import(spec.base.type_fqn.clone());
                    ctx.remove_import(spec.signature.declaring_type.clone());
                    return replacement;
                }
            }
            Some(MatchedSpec::Builder(spec, collected)) => {
                if let Some(replacement) = synthesize_builder(spec, &collected, ctx) {
                    if ctx.claim_comments(call.id) {
                        comments.extend(advisory_comments(&spec.comments));
                    }
                    ctx.add_import(spec.base.type_fqn.clone());
                    ctx.remove_import(spec.commit.declaring_type.clone());
                    if let Some(root_type) = chain_root_declaring_type(&call) {
                        ctx.remove_import(root_type);
                    }
                    return replacement;
                }
            }
            None => {}
        }

        // Return-reshape rules retarget accessor reads of variables whose
        // declaration was already retyped in this traversal.
        for ret in target.return_specs() {
            if !ret.signature.matches(&call) {
                continue;
            }
            let Some(Expression::Identifier { name, .. }) = call.receiver else {
                continue;
            };
            let Some(new_fqn) = ctx.lookup_variable(name).map(str::to_string) else {
                continue;
            };
            let receiver = Expression::Identifier {
                name: name.clone(),
                type_fqn: Some(new_fqn),
                span: Span::dummy(),
            };
            let mut bindings = BTreeMap::new();
            bindings.insert(RECEIVER_PLACEHOLDER.to_string(), receiver);
            if let Some(replacement) = ret.template.instantiate(&bindings, ctx.fresh_ids()) {
                ctx.remove_import(ret.signature.declaring_type.clone());
                return replacement;
            }
        }
    }

    // No rule applies: keep the node and descend into its children.
    match expr {
        Expression::Call {
            id,
            receiver,
            method_name,
            args,
            resolved,
            span,
        } => Expression::Call {
            id,
            receiver: receiver
                .map(|receiver| Box::new(rewrite_expression(*receiver, target, ctx, comments))),
            method_name,
            args: args
                .into_iter()
                .map(|arg| rewrite_expression(arg, target, ctx, comments))
                .collect(),
            resolved,
            span,
        },
        Expression::FieldAccess {
            receiver,
            field_name,
            span,
        } => Expression::FieldAccess {
            receiver: Box::new(rewrite_expression(*receiver, target, ctx, comments)),
            field_name,
            span,
        },
        other => other,
    }
}

/// Convenience check used by hosts that want to know whether any target of
/// the catalog could touch the unit at all.
pub fn any_target_applies(unit: &CompilationUnit, catalog: &RuleCatalog) -> bool {
    catalog
        .targets
        .iter()
        .any(|target| target.preconditions.holds(unit))
}
