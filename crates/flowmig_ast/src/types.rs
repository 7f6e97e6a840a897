// flowmig_ast/types - Spans, literals, node identity, and resolved call info
use serde::{Deserialize, Serialize};

/// Position information for AST nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Span {
    pub fn new(start_line: usize, start_column: usize, end_line: usize, end_column: usize) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    pub fn dummy() -> Self {
        Self::default()
    }
}

/// Identity of an AST node, assigned by the host parser.
///
/// Synthesized replacement nodes receive fresh ids minted past the highest id
/// seen in the unit, so identities stay unique within one traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Mints node ids for synthesized nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeIdGen {
    next: u64,
}

impl NodeIdGen {
    /// Starts minting strictly after `last_used`.
    pub fn starting_after(last_used: u64) -> Self {
        Self {
            next: last_used + 1,
        }
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    String(String),
    Number(String), // kept as string for precision
    Boolean(bool),
    Null,
    Character(char),
}

/// Resolved method information supplied by the host for a call node.
///
/// Calls without resolution can never match a signature; the host resolves
/// every call that targets a known declared API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResolution {
    /// Fully qualified name of the type declaring the invoked method.
    pub declaring_type: String,
    /// Fully qualified parameter types of the resolved overload.
    pub param_types: Vec<String>,
    /// Fully qualified return type, if the host knows it.
    pub return_type: Option<String>,
}

impl CallResolution {
    pub fn new(
        declaring_type: impl Into<String>,
        param_types: Vec<String>,
        return_type: Option<String>,
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            param_types,
            return_type,
        }
    }
}

/// Last segment of a fully qualified name ("io.client.Client" -> "Client").
pub fn simple_name(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}
