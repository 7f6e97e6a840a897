// flowmig_engine/matcher - Signature matching against resolved call nodes
use flowmig_ast::CallRef;
use serde::{Deserialize, Serialize};

/// Parameter expectation of a [`MethodSignature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamSpec {
    /// Exact overload: arity and every parameter type must match.
    Exact(Vec<String>),
    /// Any arity and types. Only valid for existence checks; argument
    /// extraction always requires the exact overload.
    Any,
}

/// Identifies one method overload (or, with [`ParamSpec::Any`], any overload)
/// on a declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub declaring_type: String,
    pub method_name: String,
    pub params: ParamSpec,
}

impl MethodSignature {
    pub fn exact(
        declaring_type: impl Into<String>,
        method_name: impl Into<String>,
        params: &[&str],
    ) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            params: ParamSpec::Exact(params.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn any(declaring_type: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            params: ParamSpec::Any,
        }
    }

    /// Pure predicate: does `call` target this signature?
    ///
    /// Calls without host resolution never match; no subtype widening is
    /// performed on parameter types.
    pub fn matches(&self, call: &CallRef<'_>) -> bool {
        let Some(resolved) = call.resolved else {
            return false;
        };
        if resolved.declaring_type != self.declaring_type
            || call.method_name != self.method_name
        {
            return false;
        }
        match &self.params {
            ParamSpec::Any => true,
            ParamSpec::Exact(expected) => resolved.param_types == *expected,
        }
    }
}
