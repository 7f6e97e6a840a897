// flowmig_engine/template - Parameterized replacement templates
//
// Templates are written as fluent call chains with `#{name}` placeholders,
// e.g. `#{base}.newBroadcastSignalCommand().signalName(#{createSignalEvent}).send().join()`.
// They are parsed into a structural form when the catalog is built; a
// template that does not parse is a catalog-construction-time fatal error.
use crate::error::CatalogError;
use flowmig_ast::{Expression, NodeIdGen, Span};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Structural form of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateExpr {
    /// `#{name}` — replaced by the bound expression at synthesis time.
    Placeholder(String),
    /// A bare identifier, e.g. `String`.
    Ident(String),
    Call {
        receiver: Option<Box<TemplateExpr>>,
        method_name: String,
        args: Vec<TemplateExpr>,
    },
}

impl TemplateExpr {
    fn collect_placeholders(&self, out: &mut BTreeSet<String>) {
        match self {
            TemplateExpr::Placeholder(name) => {
                out.insert(name.clone());
            }
            TemplateExpr::Ident(_) => {}
            TemplateExpr::Call { receiver, args, .. } => {
                if let Some(receiver) = receiver {
                    receiver.collect_placeholders(out);
                }
                for arg in args {
                    arg.collect_placeholders(out);
                }
            }
        }
    }

    fn instantiate(
        &self,
        bindings: &BTreeMap<String, Expression>,
        ids: &mut NodeIdGen,
    ) -> Option<Expression> {
        match self {
            TemplateExpr::Placeholder(name) => bindings.get(name).cloned(),
            TemplateExpr::Ident(name) => Some(Expression::Identifier {
                name: name.clone(),
                type_fqn: None,
                span: Span::dummy(),
            }),
            TemplateExpr::Call {
                receiver,
                method_name,
                args,
            } => {
                let receiver = match receiver {
                    Some(receiver) => Some(Box::new(receiver.instantiate(bindings, ids)?)),
                    None => None,
                };
                let args = args
                    .iter()
                    .map(|arg| arg.instantiate(bindings, ids))
                    .collect::<Option<Vec<_>>>()?;
                Some(Expression::Call {
                    id: ids.fresh(),
                    receiver,
                    method_name: method_name.clone(),
                    args,
                    resolved: None,
                    span: Span::dummy(),
                })
            }
        }
    }
}

/// A validated, parsed replacement template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewriteTemplate {
    text: String,
    root: TemplateExpr,
    placeholders: BTreeSet<String>,
}

impl RewriteTemplate {
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let root = Parser::new(text).parse()?;
        let mut placeholders = BTreeSet::new();
        root.collect_placeholders(&mut placeholders);
        Ok(Self {
            text: text.to_string(),
            root,
            placeholders,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Checks that the template's placeholders are exactly `declared`.
    pub fn check_placeholders(&self, declared: &BTreeSet<String>) -> Result<(), CatalogError> {
        if self.placeholders == *declared {
            return Ok(());
        }
        Err(CatalogError::PlaceholderMismatch {
            template: self.text.clone(),
            missing: declared.difference(&self.placeholders).cloned().collect(),
            unexpected: self.placeholders.difference(declared).cloned().collect(),
        })
    }

    /// Builds the replacement expression, substituting each placeholder with
    /// its bound expression and minting fresh node ids for synthesized calls.
    ///
    /// Returns `None` when a placeholder has no binding. A validated catalog
    /// cannot reach that state; the engine treats it as "leave the node
    /// unchanged" rather than failing the file.
    pub fn instantiate(
        &self,
        bindings: &BTreeMap<String, Expression>,
        ids: &mut NodeIdGen,
    ) -> Option<Expression> {
        self.root.instantiate(bindings, ids)
    }
}

/// Recursive-descent parser over the template grammar:
///
/// ```text
/// expr        := primary ( '.' ident '(' arglist? ')' )*
/// primary     := placeholder | ident ( '(' arglist? ')' )?
/// arglist     := expr ( ',' expr )*
/// placeholder := '#{' ident '}'
/// ```
struct Parser<'a> {
    text: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<TemplateExpr, CatalogError> {
        let expr = self.parse_expr()?;
        self.skip_whitespace();
        if self.pos != self.chars.len() {
            return Err(self.error(format!("unexpected trailing input at offset {}", self.pos)));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<TemplateExpr, CatalogError> {
        let mut expr = self.parse_primary()?;
        loop {
            self.skip_whitespace();
            if !self.eat('.') {
                break;
            }
            let method_name = self.parse_ident()?;
            self.expect('(')?;
            let args = self.parse_arglist()?;
            expr = TemplateExpr::Call {
                receiver: Some(Box::new(expr)),
                method_name,
                args,
            };
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<TemplateExpr, CatalogError> {
        self.skip_whitespace();
        if self.peek() == Some('#') {
            self.expect('#')?;
            self.expect('{')?;
            let name = self.parse_ident()?;
            self.expect('}')?;
            return Ok(TemplateExpr::Placeholder(name));
        }
        let name = self.parse_ident()?;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.expect('(')?;
            let args = self.parse_arglist()?;
            return Ok(TemplateExpr::Call {
                receiver: None,
                method_name: name,
                args,
            });
        }
        Ok(TemplateExpr::Ident(name))
    }

    fn parse_arglist(&mut self) -> Result<Vec<TemplateExpr>, CatalogError> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            self.expect(')')?;
            return Ok(args);
        }
    }

    fn parse_ident(&mut self) -> Result<String, CatalogError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start || self.chars[start].is_ascii_digit() {
            return Err(self.error(format!("expected identifier at offset {}", start)));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CatalogError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected `{}` at offset {}",
                expected, self.pos
            )))
        }
    }

    fn error(&self, detail: String) -> CatalogError {
        CatalogError::TemplateParse {
            template: self.text.to_string(),
            detail,
        }
    }
}
