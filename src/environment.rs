use std::collections::HashMap;

use log::trace;

use crate::object::Object;

/// Index of a scope inside an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: ScopeId = ScopeId(0);
}

#[derive(Debug, Default)]
struct Scope {
    enclosing: Option<ScopeId>,
    values: HashMap<String, Object>,
}

/// Chain of variable scopes stored in an arena. Slot 0 is the global scope and
/// lives as long as the environment does, so one environment can be reused
/// across many runs and keep its global bindings. Block scopes are pushed on
/// entry and popped on exit.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::default()], current: ScopeId::GLOBAL }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    /// Number of live scopes, globals included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Enter a new scope enclosed by the current one.
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope { enclosing: Some(self.current), ..Default::default() });
        self.current = id;
        trace!("entered scope {}", id.0);
        id
    }

    /// Leave the current scope and drop its bindings. The global scope is
    /// never popped.
    pub fn pop_scope(&mut self) {
        let Some(enclosing) = self.scopes[self.current.0].enclosing else {
            return;
        };

        trace!("left scope {}", self.current.0);
        self.scopes.truncate(self.current.0);
        self.current = enclosing;
    }

    /// Create or overwrite a binding in the current scope.
    pub fn define(&mut self, name: &str, value: Object) {
        self.scopes[self.current.0].values.insert(name.to_owned(), value);
    }

    /// Update the nearest existing binding of `name`. Returns `false` and
    /// changes nothing when no scope in the chain defines it.
    pub fn assign(&mut self, name: &str, value: Object) -> bool {
        match self.resolve(name) {
            Some(id) => {
                self.scopes[id.0].values.insert(name.to_owned(), value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.resolve(name).and_then(|id| self.scopes[id.0].values.get(name))
    }

    fn resolve(&self, name: &str) -> Option<ScopeId> {
        let mut scope = Some(self.current);

        // Ask one level above until we run out of scopes
        while let Some(id) = scope {
            if self.scopes[id.0].values.contains_key(name) {
                return Some(id);
            }
            scope = self.scopes[id.0].enclosing;
        }

        None
    }
}
