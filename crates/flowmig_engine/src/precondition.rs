// flowmig_engine/precondition - Whole-unit existence checks gating traversal
use crate::matcher::MethodSignature;
use flowmig_ast::{CompilationUnit, Expression, Statement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Existence predicate evaluated once per unit before the engine commits to a
/// full rewrite traversal.
///
/// Evaluation is a safe over-approximation: it may report usage when no
/// rewrite ends up applicable (a wasted traversal), but it never reports
/// absence when a rewrite is applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Precondition {
    /// The type is referenced anywhere in the unit (imports, declarations,
    /// resolved call info).
    UsesType(String),
    /// The method is referenced anywhere, ignoring overload resolution.
    UsesMethod(MethodSignature),
    AllOf(Vec<Precondition>),
    AnyOf(Vec<Precondition>),
}

impl Precondition {
    pub fn holds(&self, unit: &CompilationUnit) -> bool {
        self.eval(&UnitScan::of(unit))
    }

    fn eval(&self, scan: &UnitScan) -> bool {
        match self {
            Precondition::UsesType(fqn) => scan.uses_type(fqn),
            Precondition::UsesMethod(signature) => scan.uses_method(signature),
            Precondition::AllOf(preds) => preds.iter().all(|p| p.eval(scan)),
            Precondition::AnyOf(preds) => preds.iter().any(|p| p.eval(scan)),
        }
    }
}

/// Whether the unit's statements still reference `fqn` anywhere. The import
/// list itself is deliberately ignored: this check decides whether a
/// removable import is actually unused after rewriting.
pub fn unit_body_uses_type(unit: &CompilationUnit, fqn: &str) -> bool {
    let mut scan = UnitScan::default();
    for stmt in &unit.statements {
        scan.visit_statement(stmt);
    }
    scan.uses_type(fqn)
}

/// One-pass existence index over a compilation unit.
#[derive(Debug, Default)]
struct UnitScan {
    types: BTreeSet<String>,
    /// (declaring type, method name) pairs of resolved calls.
    resolved_methods: BTreeSet<(String, String)>,
    /// Method names of calls the host could not resolve. Matched by name
    /// alone so the scan stays an over-approximation.
    unresolved_methods: BTreeSet<String>,
}

impl UnitScan {
    fn of(unit: &CompilationUnit) -> Self {
        let mut scan = UnitScan::default();
        for import in &unit.imports {
            scan.types.insert(import.clone());
        }
        for stmt in &unit.statements {
            scan.visit_statement(stmt);
        }
        scan
    }

    fn uses_type(&self, fqn: &str) -> bool {
        self.types.contains(fqn)
    }

    /// Ignores `signature.params` entirely: existence checks never resolve
    /// overloads, even when handed an exact signature.
    fn uses_method(&self, signature: &MethodSignature) -> bool {
        self.resolved_methods.contains(&(
            signature.declaring_type.clone(),
            signature.method_name.clone(),
        )) || self.unresolved_methods.contains(&signature.method_name)
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDeclaration {
                type_fqn,
                initializer,
                ..
            } => {
                if let Some(fqn) = type_fqn {
                    self.types.insert(fqn.clone());
                }
                if let Some(init) = initializer {
                    self.visit_expression(init);
                }
            }
            Statement::Expression { expr, .. } => self.visit_expression(expr),
            Statement::Block { statements, .. } => {
                for stmt in statements {
                    self.visit_statement(stmt);
                }
            }
        }
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Literal(..) => {}
            Expression::Identifier { type_fqn, .. } => {
                if let Some(fqn) = type_fqn {
                    self.types.insert(fqn.clone());
                }
            }
            Expression::Call {
                receiver,
                method_name,
                args,
                resolved,
                ..
            } => {
                match resolved {
                    Some(resolution) => {
                        self.types.insert(resolution.declaring_type.clone());
                        for param in &resolution.param_types {
                            self.types.insert(param.clone());
                        }
                        if let Some(return_type) = &resolution.return_type {
                            self.types.insert(return_type.clone());
                        }
                        self.resolved_methods.insert((
                            resolution.declaring_type.clone(),
                            method_name.clone(),
                        ));
                    }
                    None => {
                        self.unresolved_methods.insert(method_name.clone());
                    }
                }
                if let Some(receiver) = receiver {
                    self.visit_expression(receiver);
                }
                for arg in args {
                    self.visit_expression(arg);
                }
            }
            Expression::FieldAccess { receiver, .. } => self.visit_expression(receiver),
        }
    }
}
