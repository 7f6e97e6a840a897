use crate::*;

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

fn call(id: u64, receiver: Expression, method: &str, args: Vec<Expression>) -> Expression {
    Expression::Call {
        id: NodeId(id),
        receiver: Some(Box::new(receiver)),
        method_name: method.to_string(),
        args,
        resolved: None,
        span: dummy_span(),
    }
}

#[test]
fn simple_name_takes_last_segment() {
    assert_eq!(simple_name("io.camunda.client.CamundaClient"), "CamundaClient");
    assert_eq!(simple_name("String"), "String");
}

#[test]
fn node_id_gen_starts_after_seed() {
    let mut gen = NodeIdGen::starting_after(41);
    assert_eq!(gen.fresh(), NodeId(42));
    assert_eq!(gen.fresh(), NodeId(43));
}

#[test]
fn max_node_id_covers_nested_calls() {
    let chain = call(7, call(9, ident("service"), "createSignalEvent", vec![]), "send", vec![]);
    let unit = CompilationUnit {
        package: None,
        imports: Vec::new(),
        statements: vec![
            Statement::Expression {
                expr: chain,
                comments: Vec::new(),
                span: dummy_span(),
            },
            Statement::VarDeclaration {
                id: NodeId(3),
                name: "x".to_string(),
                type_fqn: None,
                initializer: None,
                comments: Vec::new(),
                span: dummy_span(),
            },
        ],
        span: dummy_span(),
    };
    assert_eq!(unit.max_node_id(), 9);
}

#[test]
fn render_chain_keeps_receiver_order() {
    let chain = call(
        2,
        call(
            1,
            ident("client"),
            "newBroadcastSignalCommand",
            vec![],
        ),
        "send",
        vec![],
    );
    assert_eq!(
        render_expression(&chain),
        "client.newBroadcastSignalCommand().send()"
    );
}

#[test]
fn render_statement_emits_comments_first() {
    let mut builder = SourceBuilder::new("    ");
    render_statement(
        &Statement::Expression {
            expr: ident("noop"),
            comments: vec![AdvisoryComment::new(" executionId was removed")],
            span: dummy_span(),
        },
        &mut builder,
    );
    assert_eq!(builder.build(), "// executionId was removed\nnoop;\n");
}

#[test]
fn expression_round_trips_through_json() {
    let expr = call(5, ident("service"), "signalEventReceived", vec![
        Expression::Literal(Literal::String("orderReceived".to_string()), dummy_span()),
    ]);
    let encoded = serde_json::to_string(&expr).expect("expression should serialize");
    let decoded: Expression = serde_json::from_str(&encoded).expect("expression should deserialize");
    assert_eq!(decoded, expr);
}
