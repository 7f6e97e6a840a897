// flowmig_ast/statement - Statement nodes and compilation unit structure
use crate::comments::AdvisoryComment;
use crate::expression::Expression;
use crate::types::{NodeId, Span};
use serde::{Deserialize, Serialize};

/// Statement node of the abstract tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// A local variable declaration with an optional initializer.
    VarDeclaration {
        id: NodeId,
        name: String,
        /// Declared type as a fully qualified name, when annotated.
        type_fqn: Option<String>,
        initializer: Option<Expression>,
        comments: Vec<AdvisoryComment>,
        span: Span,
    },

    /// An expression used as a statement.
    Expression {
        expr: Expression,
        comments: Vec<AdvisoryComment>,
        span: Span,
    },

    /// A nested statement block, opening a new variable scope.
    Block { statements: Vec<Statement>, span: Span },
}

impl Statement {
    pub fn span(&self) -> &Span {
        match self {
            Statement::VarDeclaration { span, .. }
            | Statement::Expression { span, .. }
            | Statement::Block { span, .. } => span,
        }
    }
}

/// One parsed compilation unit, the scope of a single engine traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl CompilationUnit {
    /// Highest node id present anywhere in the unit. Used to seed the id
    /// generator for synthesized nodes.
    pub fn max_node_id(&self) -> u64 {
        fn visit_expr(expr: &Expression, max: &mut u64) {
            if let Expression::Call {
                id, receiver, args, ..
            } = expr
            {
                *max = (*max).max(id.0);
                if let Some(receiver) = receiver {
                    visit_expr(receiver, max);
                }
                for arg in args {
                    visit_expr(arg, max);
                }
            } else if let Expression::FieldAccess { receiver, .. } = expr {
                visit_expr(receiver, max);
            }
        }

        fn visit_stmt(stmt: &Statement, max: &mut u64) {
            match stmt {
                Statement::VarDeclaration {
                    id, initializer, ..
                } => {
                    *max = (*max).max(id.0);
                    if let Some(init) = initializer {
                        visit_expr(init, max);
                    }
                }
                Statement::Expression { expr, .. } => visit_expr(expr, max),
                Statement::Block { statements, .. } => {
                    for stmt in statements {
                        visit_stmt(stmt, max);
                    }
                }
            }
        }

        let mut max = 0;
        for stmt in &self.statements {
            visit_stmt(stmt, &mut max);
        }
        max
    }
}
