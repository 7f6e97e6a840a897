// flowmig_ast/expression - Expression nodes of the abstract call tree
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Expression node of the call tree the rewrite engine operates on.
///
/// The variant set is closed and matched exhaustively. A builder chain is a
/// `Call` whose receiver is itself a `Call`; the chain bottoms out at an
/// identifier (instance call), or at `None` for static/root calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal, Span),

    Identifier {
        name: String,
        /// Fully qualified type of the identifier, when the host resolved it.
        type_fqn: Option<String>,
        span: Span,
    },

    Call {
        id: NodeId,
        /// None for static/root calls.
        receiver: Option<Box<Expression>>,
        method_name: String,
        args: Vec<Expression>,
        /// Host-supplied resolution; unresolved calls never match signatures.
        resolved: Option<CallResolution>,
        span: Span,
    },

    FieldAccess {
        receiver: Box<Expression>,
        field_name: String,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> &Span {
        match self {
            Expression::Literal(_, span)
            | Expression::Identifier { span, .. }
            | Expression::Call { span, .. }
            | Expression::FieldAccess { span, .. } => span,
        }
    }

    /// Convenience accessor for call nodes.
    pub fn as_call(&self) -> Option<CallRef<'_>> {
        match self {
            Expression::Call {
                id,
                receiver,
                method_name,
                args,
                resolved,
                span,
            } => Some(CallRef {
                id: *id,
                receiver: receiver.as_deref(),
                method_name,
                args,
                resolved: resolved.as_ref(),
                span,
            }),
            _ => None,
        }
    }
}

/// Borrowed view of a `Expression::Call` node.
#[derive(Debug, Clone, Copy)]
pub struct CallRef<'a> {
    pub id: NodeId,
    pub receiver: Option<&'a Expression>,
    pub method_name: &'a str,
    pub args: &'a [Expression],
    pub resolved: Option<&'a CallResolution>,
    pub span: &'a Span,
}
