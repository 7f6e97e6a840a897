//! End-to-end rewrites of signal broadcasting call sites, covering simple
//! overloads and fluent builder chains with optional steps in any order.

use flowmig_ast::{
    render_unit, CallResolution, CompilationUnit, Expression, NodeId, Span, Statement,
};
use flowmig_engine::{
    BaseIdentifier, BuilderSpecConfig, MethodSignature, MigrationTarget, NamedArg, Precondition,
    ReplacementSpec, ReturnType, RewriteTemplate, RuleCatalog, SimpleSpec,
    rewrite_unit,
};

const ENGINE: &str = "org.camunda.bpm.engine.RuntimeService";
const SIGNAL_BUILDER: &str = "org.camunda.bpm.engine.runtime.SignalEventReceivedBuilder";
const CLIENT: &str = "io.camunda.client.CamundaClient";
const SIGNAL_RESPONSE: &str = "io.camunda.client.api.response.BroadcastSignalResponse";

fn dummy_span() -> Span {
    Span::dummy()
}

fn ident(name: &str) -> Expression {
    Expression::Identifier {
        name: name.to_string(),
        type_fqn: None,
        span: dummy_span(),
    }
}

fn resolved_call(
    id: u64,
    receiver: Expression,
    method: &str,
    args: Vec<Expression>,
    declaring_type: &str,
    param_types: &[&str],
) -> Expression {
    Expression::Call {
        id: NodeId(id),
        receiver: Some(Box::new(receiver)),
        method_name: method.to_string(),
        args,
        resolved: Some(CallResolution::new(
            declaring_type,
            param_types.iter().map(|p| p.to_string()).collect(),
            None,
        )),
        span: dummy_span(),
    }
}

fn chain_link(id: u64, receiver: Expression, method: &str, args: Vec<Expression>) -> Expression {
    Expression::Call {
        id: NodeId(id),
        receiver: Some(Box::new(receiver)),
        method_name: method.to_string(),
        args,
        resolved: None,
        span: dummy_span(),
    }
}

fn base() -> BaseIdentifier {
    BaseIdentifier::new("camundaClient", CLIENT)
}

fn signal_target() -> MigrationTarget {
    let broadcast_template = RewriteTemplate::parse(
        "#{base}.newBroadcastSignalCommand().signalName(#{signalName}).send().join()",
    )
    .expect("simple template parses");

    let simple_global = SimpleSpec::new(
        MethodSignature::exact(ENGINE, "signalEventReceived", &["java.lang.String"]),
        broadcast_template.clone(),
        base(),
        ReturnType::Specified(SIGNAL_RESPONSE.to_string()),
        vec![NamedArg::new("signalName", 0)],
        Vec::new(),
    )
    .expect("simple spec is well formed");

    // the two-arg overload targets one execution; the new API can only
    // broadcast, so the executionId argument is dropped with a comment
    let simple_to_execution = SimpleSpec::new(
        MethodSignature::exact(
            ENGINE,
            "signalEventReceived",
            &["java.lang.String", "java.lang.String"],
        ),
        broadcast_template,
        base(),
        ReturnType::Specified(SIGNAL_RESPONSE.to_string()),
        vec![NamedArg::new("signalName", 0)],
        vec![" executionId was removed".to_string()],
    )
    .expect("simple spec is well formed");

    let builder_specs = BuilderSpecConfig {
        commit: MethodSignature::exact(SIGNAL_BUILDER, "send", &[]),
        mandatory_step: "createSignalEvent".to_string(),
        optional_steps: vec![
            "setVariables".to_string(),
            "tenantId".to_string(),
            "executionId".to_string(),
        ],
        extractable: vec![
            (
                "createSignalEvent".to_string(),
                ".signalName(#{createSignalEvent})".to_string(),
            ),
            (
                "setVariables".to_string(),
                ".variables(#{setVariables})".to_string(),
            ),
            ("tenantId".to_string(), ".tenantId(#{tenantId})".to_string()),
        ],
        prefix: "#{base}.newBroadcastSignalCommand()".to_string(),
        suffix: ".send().join()".to_string(),
        base: base(),
        return_type: ReturnType::Specified(SIGNAL_RESPONSE.to_string()),
        extra_comments: Vec::new(),
    }
    .expand()
    .expect("builder expansion succeeds");

    let specs = vec![
        ReplacementSpec::Simple(simple_global),
        ReplacementSpec::Simple(simple_to_execution),
    ]
    .into_iter()
    .chain(builder_specs.into_iter().map(ReplacementSpec::Builder))
    .collect();

    MigrationTarget::new(
        "broadcast-signals",
        Precondition::AllOf(vec![
            Precondition::UsesType(ENGINE.to_string()),
            Precondition::AnyOf(vec![
                Precondition::UsesMethod(MethodSignature::any(ENGINE, "signalEventReceived")),
                Precondition::UsesMethod(MethodSignature::any(ENGINE, "createSignalEvent")),
            ]),
        ]),
        specs,
    )
    .expect("catalog is well formed")
}

fn catalog() -> RuleCatalog {
    RuleCatalog::new(vec![signal_target()])
}

/// `runtimeService.createSignalEvent(signalName)` followed by the given
/// optional steps in the given source order, committed with `.send()`.
fn signal_chain(step_order: &[(&str, &str)]) -> Expression {
    let mut expr = resolved_call(
        10,
        ident("runtimeService"),
        "createSignalEvent",
        vec![ident("signalName")],
        ENGINE,
        &["java.lang.String"],
    );
    let mut next_id = 11;
    for (step, arg) in step_order {
        expr = chain_link(next_id, expr, step, vec![ident(arg)]);
        next_id += 1;
    }
    resolved_call(next_id, expr, "send", vec![], SIGNAL_BUILDER, &[])
}

fn unit_with_statement(stmt: Statement) -> CompilationUnit {
    CompilationUnit {
        package: Some("org.camunda.community.migration.example".to_string()),
        imports: vec![ENGINE.to_string()],
        statements: vec![stmt],
        span: dummy_span(),
    }
}

fn expression_statement(expr: Expression) -> Statement {
    Statement::Expression {
        expr,
        comments: Vec::new(),
        span: dummy_span(),
    }
}

#[test]
fn tenant_only_chain_selects_the_exact_spec() {
    let unit = unit_with_statement(expression_statement(signal_chain(&[("tenantId", "tenant")])));
    let rewritten = rewrite_unit(unit, &catalog());

    let Statement::Expression { expr, comments, .. } = &rewritten.statements[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(
        flowmig_ast::render_expression(expr),
        "camundaClient.newBroadcastSignalCommand().signalName(signalName).tenantId(tenant).send().join()"
    );
    // tenantId and the mandatory step are both extractable: nothing removed
    assert!(comments.is_empty());
}

#[test]
fn execution_id_step_is_dropped_with_one_comment() {
    let unit = unit_with_statement(expression_statement(signal_chain(&[
        ("tenantId", "tenant"),
        ("executionId", "execution"),
    ])));
    let rewritten = rewrite_unit(unit, &catalog());

    let Statement::Expression { expr, comments, .. } = &rewritten.statements[0] else {
        panic!("expected expression statement");
    };
    let rendered = flowmig_ast::render_expression(expr);
    assert_eq!(
        rendered,
        "camundaClient.newBroadcastSignalCommand().signalName(signalName).tenantId(tenant).send().join()"
    );
    assert!(!rendered.contains("execution"));
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " executionId was removed");
}

#[test]
fn chain_order_does_not_affect_the_rewritten_output() {
    let forward = unit_with_statement(expression_statement(signal_chain(&[
        ("setVariables", "variables"),
        ("tenantId", "tenant"),
    ])));
    let backward = unit_with_statement(expression_statement(signal_chain(&[
        ("tenantId", "tenant"),
        ("setVariables", "variables"),
    ])));

    let rendered_forward = render_unit(&rewrite_unit(forward, &catalog()));
    let rendered_backward = render_unit(&rewrite_unit(backward, &catalog()));
    assert_eq!(rendered_forward, rendered_backward);
    assert!(rendered_forward.contains(
        "camundaClient.newBroadcastSignalCommand().signalName(signalName)\
         .variables(variables).tenantId(tenant).send().join();"
    ));
}

#[test]
fn two_arg_overload_drops_execution_id_with_comment() {
    let call = resolved_call(
        1,
        ident("runtimeService"),
        "signalEventReceived",
        vec![ident("signalName"), ident("executionId")],
        ENGINE,
        &["java.lang.String", "java.lang.String"],
    );
    let rewritten = rewrite_unit(unit_with_statement(expression_statement(call)), &catalog());

    let Statement::Expression { expr, comments, .. } = &rewritten.statements[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(
        flowmig_ast::render_expression(expr),
        "camundaClient.newBroadcastSignalCommand().signalName(signalName).send().join()"
    );
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " executionId was removed");
}

#[test]
fn unrecognized_steps_stay_out_of_matching() {
    // unknownStep is not part of the step vocabulary: it is ignored for
    // matching and its argument is left behind
    let unit = unit_with_statement(expression_statement(signal_chain(&[
        ("unknownStep", "x"),
        ("tenantId", "tenant"),
    ])));
    let rewritten = rewrite_unit(unit, &catalog());

    let Statement::Expression { expr, .. } = &rewritten.statements[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(
        flowmig_ast::render_expression(expr),
        "camundaClient.newBroadcastSignalCommand().signalName(signalName).tenantId(tenant).send().join()"
    );
}

#[test]
fn declaration_retype_claims_comment_ownership_once() {
    let decl = Statement::VarDeclaration {
        id: NodeId(100),
        name: "response".to_string(),
        type_fqn: None,
        initializer: Some(signal_chain(&[("executionId", "execution")])),
        comments: Vec::new(),
        span: dummy_span(),
    };
    let rewritten = rewrite_unit(unit_with_statement(decl), &catalog());

    let Statement::VarDeclaration {
        type_fqn, comments, ..
    } = &rewritten.statements[0]
    else {
        panic!("expected variable declaration");
    };
    assert_eq!(type_fqn.as_deref(), Some(SIGNAL_RESPONSE));
    // declaration visitor and invocation visitor both run; the comment is
    // attached exactly once
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, " executionId was removed");
}

#[test]
fn rewriting_is_idempotent() {
    let unit = unit_with_statement(expression_statement(signal_chain(&[("tenantId", "tenant")])));
    let once = rewrite_unit(unit, &catalog());
    let twice = rewrite_unit(once.clone(), &catalog());
    assert_eq!(once, twice);
}

#[test]
fn units_without_legacy_usage_pass_through_untouched() {
    let unit = CompilationUnit {
        package: None,
        imports: vec!["java.util.List".to_string()],
        statements: vec![expression_statement(chain_link(
            1,
            ident("service"),
            "doSomethingElse",
            vec![],
        ))],
        span: dummy_span(),
    };
    let rewritten = rewrite_unit(unit.clone(), &catalog());
    assert_eq!(rewritten, unit);
}

#[test]
fn imports_follow_the_rewrite() {
    let unit = unit_with_statement(expression_statement(signal_chain(&[])));
    let rewritten = rewrite_unit(unit, &catalog());
    assert!(rewritten.imports.contains(&CLIENT.to_string()));
    // the chain root was the unit's last use of the legacy engine type
    assert!(!rewritten.imports.contains(&ENGINE.to_string()));
}
