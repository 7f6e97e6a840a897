// flowmig_ast/render - Deterministic plain-text rendering of the tree
//
// The host owns real re-serialization; this renderer exists so diagnostics
// and tests can compare rewritten trees byte-for-byte.
use crate::expression::Expression;
use crate::statement::{CompilationUnit, Statement};
use crate::types::{simple_name, Literal};

/// Incrementally builds rendered source text with indentation handling.
#[derive(Debug, Default, Clone)]
pub struct SourceBuilder {
    content: String,
    indent_level: usize,
    indent: String,
}

impl SourceBuilder {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            indent_level: 0,
            indent: indent.into(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        for _ in 0..self.indent_level {
            self.content.push_str(&self.indent);
        }
        self.content.push_str(line);
        self.content.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn build(self) -> String {
        self.content
    }
}

pub fn render_expression(expr: &Expression) -> String {
    match expr {
        Expression::Literal(literal, _) => render_literal(literal),
        Expression::Identifier { name, .. } => name.clone(),
        Expression::Call {
            receiver,
            method_name,
            args,
            ..
        } => {
            let rendered_args = args
                .iter()
                .map(render_expression)
                .collect::<Vec<_>>()
                .join(", ");
            match receiver {
                Some(receiver) => format!(
                    "{}.{}({})",
                    render_expression(receiver),
                    method_name,
                    rendered_args
                ),
                None => format!("{}({})", method_name, rendered_args),
            }
        }
        Expression::FieldAccess {
            receiver,
            field_name,
            ..
        } => format!("{}.{}", render_expression(receiver), field_name),
    }
}

fn render_literal(literal: &Literal) -> String {
    match literal {
        Literal::String(value) => format!("\"{}\"", value),
        Literal::Number(value) => value.clone(),
        Literal::Boolean(value) => value.to_string(),
        Literal::Null => "null".to_string(),
        Literal::Character(value) => format!("'{}'", value),
    }
}

pub fn render_statement(stmt: &Statement, builder: &mut SourceBuilder) {
    match stmt {
        Statement::VarDeclaration {
            name,
            type_fqn,
            initializer,
            comments,
            ..
        } => {
            for comment in comments {
                builder.push_line(&format!("//{}", comment.text));
            }
            let declared = type_fqn
                .as_deref()
                .map(simple_name)
                .unwrap_or("var")
                .to_string();
            match initializer {
                Some(init) => builder.push_line(&format!(
                    "{} {} = {};",
                    declared,
                    name,
                    render_expression(init)
                )),
                None => builder.push_line(&format!("{} {};", declared, name)),
            }
        }
        Statement::Expression { expr, comments, .. } => {
            for comment in comments {
                builder.push_line(&format!("//{}", comment.text));
            }
            builder.push_line(&format!("{};", render_expression(expr)));
        }
        Statement::Block { statements, .. } => {
            builder.push_line("{");
            builder.indent();
            for stmt in statements {
                render_statement(stmt, builder);
            }
            builder.dedent();
            builder.push_line("}");
        }
    }
}

pub fn render_unit(unit: &CompilationUnit) -> String {
    let mut builder = SourceBuilder::new("    ");
    if let Some(package) = &unit.package {
        builder.push_line(&format!("package {};", package));
        builder.push_line("");
    }
    if !unit.imports.is_empty() {
        for import in &unit.imports {
            builder.push_line(&format!("import {};", import));
        }
        builder.push_line("");
    }
    for stmt in &unit.statements {
        render_statement(stmt, &mut builder);
    }
    builder.build()
}
