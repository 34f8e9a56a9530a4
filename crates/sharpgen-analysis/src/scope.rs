//! Lexical scope tracking for one analysis run.
//!
//! Scopes live in an arena and link to their parent by index. Each scope
//! records the variables it declares and, in first-access order, the
//! variables that were accessed inside it without a declaration in it
//! ("escaping" variables).
//!
//! # Escape propagation
//!
//! ```text
//! Method(a)                 escaping: []
//! └── Block(x)              escaping: [a]
//!     └── BlockMethod()     escaping: [x, a]   <- access(x), access(a)
//! ```
//!
//! An access is recorded at every level between the use and the first scope
//! that declares the variable, so a block-method scope ends up with exactly
//! the variables it must receive as parameters.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use sharpgen_common::limits::SCOPE_INLINE_VARIABLES;
use sharpgen_common::{AnalysisError, Result, UndefinedVariable};
use sharpgen_model::{TypeResolver, VarId, Variable};
use smallvec::SmallVec;
use tracing::trace;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Body of a declared method. Escapes left here are undefined variables.
    Method,
    /// Body of a block being hoisted into its own method. Escapes left here
    /// become the method's parameters.
    BlockMethod,
    /// A block, lambda or catch clause that stays inline.
    Nested,
    /// Root of a free-standing expression. Escapes left here are reported
    /// as free variables.
    Expression,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    declared: SmallVec<[VarId; SCOPE_INLINE_VARIABLES]>,
    escaping: IndexMap<VarId, Variable, FxBuildHasher>,
}

impl Scope {
    fn declares(&self, id: VarId) -> bool {
        self.declared.contains(&id)
    }
}

/// Stack of lexical scopes for the position currently being visited.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    scopes: Vec<Scope>,
    current: Option<ScopeId>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a scope whose initial declarations are `parameters`, linked to
    /// the current scope as parent.
    pub fn enter_scope(&mut self, kind: ScopeKind, parameters: &[Variable]) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent: self.current,
            declared: parameters.iter().map(Variable::id).collect(),
            escaping: IndexMap::default(),
        });
        trace!(scope = id.0, ?kind, parent = ?self.current.map(|p| p.0), "enter scope");
        self.current = Some(id);
        id
    }

    /// Pop the current scope.
    pub fn exit_scope(&mut self) {
        if let Some(id) = self.current {
            trace!(scope = id.0, "exit scope");
            self.current = self.scopes[id.0 as usize].parent;
        }
    }

    pub fn declare(&mut self, variable: &Variable) {
        if let Some(scope) = self.current_scope_mut()
            && !scope.declares(variable.id())
        {
            scope.declared.push(variable.id());
        }
    }

    pub fn declare_all(&mut self, variables: &[Variable]) {
        for variable in variables {
            self.declare(variable);
        }
    }

    /// Record a use of `variable` at the current position.
    pub fn access(&mut self, variable: &Variable) {
        let mut cursor = self.current;
        while let Some(id) = cursor {
            let scope = &mut self.scopes[id.0 as usize];
            if scope.declares(variable.id()) {
                return;
            }
            if !scope.escaping.contains_key(&variable.id()) {
                trace!(scope = id.0, variable = variable.name(), "escaping access");
                scope.escaping.insert(variable.id(), variable.clone());
            }
            cursor = scope.parent;
        }
    }

    /// Whether `variable` has escaped the current scope so far, i.e. it is
    /// about to become a parameter of the method being synthesized.
    pub fn is_parameter_of_current_scope(&self, variable: &Variable) -> bool {
        self.current_scope()
            .is_some_and(|scope| scope.escaping.contains_key(&variable.id()))
    }

    pub fn current_kind(&self) -> Option<ScopeKind> {
        self.current_scope().map(|scope| scope.kind)
    }

    /// Number of scopes on the stack.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut cursor = self.current;
        while let Some(id) = cursor {
            depth += 1;
            cursor = self.scopes[id.0 as usize].parent;
        }
        depth
    }

    /// Close the current scope's bookkeeping and return its escaping
    /// variables in first-access order.
    ///
    /// Escapes are re-checked against the scope's final declaration set,
    /// since a declaration may be seen after an earlier access. Escapes
    /// left in a [`ScopeKind::Method`] scope are an error naming `method`.
    pub fn finalize(&mut self, method: &str, resolver: &dyn TypeResolver) -> Result<Vec<Variable>> {
        let Some(scope) = self.current_scope_mut() else {
            return Ok(Vec::new());
        };
        let declared = scope.declared.clone();
        scope.escaping.retain(|id, _| !declared.contains(id));
        let escaping: Vec<Variable> = scope.escaping.values().cloned().collect();

        if scope.kind == ScopeKind::Method && !escaping.is_empty() {
            return Err(AnalysisError::UndefinedVariables {
                method: method.to_string(),
                variables: escaping
                    .iter()
                    .map(|v| UndefinedVariable::new(v.name(), resolver.display_name(v.ty())))
                    .collect(),
            });
        }
        Ok(escaping)
    }

    fn current_scope(&self) -> Option<&Scope> {
        self.current.map(|id| &self.scopes[id.0 as usize])
    }

    fn current_scope_mut(&mut self) -> Option<&mut Scope> {
        self.current.map(|id| &mut self.scopes[id.0 as usize])
    }
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod tests;
