use crate::types::Span;
use serde::{Deserialize, Serialize};

/// Human-readable annotation attached to a rewritten statement, noting
/// dropped or altered behavior (e.g. " executionId was removed").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryComment {
    pub text: String,
    pub span: Span,
}

impl AdvisoryComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            span: Span::dummy(),
        }
    }
}
