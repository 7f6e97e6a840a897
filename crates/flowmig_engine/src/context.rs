// flowmig_engine/context - Per-traversal rewrite state
use flowmig_ast::{CompilationUnit, NodeId, NodeIdGen};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Mutable state for one compilation-unit traversal.
///
/// Created empty at traversal start and discarded at the end of the unit's
/// traversal; never shared across units, never a process-wide singleton. The
/// rule catalog stays immutable, so units may be processed in parallel with
/// one context each.
#[derive(Debug)]
pub struct RewriteContext {
    /// Variable name -> rewritten semantic type, nearest enclosing block
    /// lookup. Written whenever a declaration's type changes.
    scope_stack: Vec<HashMap<String, String>>,
    /// Original node ids whose advisory comments are already attached by one
    /// visitor; a second overlapping visit must not duplicate them.
    commented: HashSet<NodeId>,
    imports_to_add: BTreeSet<String>,
    imports_to_remove: BTreeSet<String>,
    ids: NodeIdGen,
}

impl RewriteContext {
    /// Context for one traversal of `unit`, minting synthesized node ids past
    /// the unit's existing maximum.
    pub fn for_unit(unit: &CompilationUnit) -> Self {
        Self {
            scope_stack: vec![HashMap::new()],
            commented: HashSet::new(),
            imports_to_add: BTreeSet::new(),
            imports_to_remove: BTreeSet::new(),
            ids: NodeIdGen::starting_after(unit.max_node_id()),
        }
    }

    pub fn enter_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub fn record_variable(&mut self, name: impl Into<String>, type_fqn: impl Into<String>) {
        if let Some(current) = self.scope_stack.last_mut() {
            current.insert(name.into(), type_fqn.into());
        }
    }

    /// Nearest-enclosing-block lookup of a variable's rewritten type.
    pub fn lookup_variable(&self, name: &str) -> Option<&str> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).map(String::as_str))
    }

    /// Claims advisory-comment ownership for the original node `id`. Returns
    /// true for the first caller; later callers must suppress their comments.
    pub fn claim_comments(&mut self, id: NodeId) -> bool {
        self.commented.insert(id)
    }

    pub fn add_import(&mut self, fqn: impl Into<String>) {
        self.imports_to_add.insert(fqn.into());
    }

    pub fn remove_import(&mut self, fqn: impl Into<String>) {
        self.imports_to_remove.insert(fqn.into());
    }

    pub fn fresh_ids(&mut self) -> &mut NodeIdGen {
        &mut self.ids
    }

    /// Applies the accumulated import intents to the unit: removable imports
    /// are dropped only when the rewritten unit no longer references the
    /// type, new imports are appended once, and the list is kept sorted.
    /// Idempotent.
    pub fn apply_import_intents(&self, unit: &mut CompilationUnit) {
        let dropped: Vec<String> = unit
            .imports
            .iter()
            .filter(|import| {
                self.imports_to_remove.contains(*import)
                    && !self.imports_to_add.contains(*import)
                    && !crate::precondition::unit_body_uses_type(unit, import)
            })
            .cloned()
            .collect();
        unit.imports.retain(|import| !dropped.contains(import));
        for import in &self.imports_to_add {
            if !unit.imports.contains(import) {
                unit.imports.push(import.clone());
            }
        }
        unit.imports.sort();
        unit.imports.dedup();
    }
}
