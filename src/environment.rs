use std::collections::HashMap;

use crate::error::{RuntimeError, RuntimeResult};
use crate::expr::LiteralValue;
use crate::scanner::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
    values: HashMap<String, LiteralValue>,
    enclosing: Option<ScopeId>,
}

/// Chain of lexical scopes. Scopes live in an arena and link to their enclosing scope by
/// index; the global scope sits at index 0 and is never popped.
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
    pub fn new() -> Environment {
        Environment {
            scopes: vec![Scope {
                values: HashMap::new(),
                enclosing: None,
            }],
            current: ScopeId(0),
        }
    }

    /// Enter a new scope enclosed by the current one.
    pub fn push(&mut self) {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            values: HashMap::new(),
            enclosing: Some(self.current),
        });
        self.current = id;
        tracing::trace!(depth = self.depth(), "entered scope");
    }

    /// Leave the current scope, dropping its bindings.
    pub fn pop(&mut self) {
        // block scopes are strictly nested, so the current scope is always the newest
        match self.scopes[self.current.0].enclosing {
            Some(enclosing) => {
                self.scopes.truncate(self.current.0);
                self.current = enclosing;
                tracing::trace!(depth = self.depth(), "left scope");
            }
            None => panic!("Attempted to pop the global scope."), // panic here because this would indicate a bug in the interpreter
        }
    }

    /// Drop every scope except the global one.
    pub fn reset_to_global(&mut self) {
        self.scopes.truncate(1);
        self.current = ScopeId(0);
    }

    /// Number of scopes on the active chain, counting the global scope.
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Bind a name in the innermost scope, replacing any earlier binding there.
    pub fn define(&mut self, name: &str, value: LiteralValue) {
        self.scopes[self.current.0].values.insert(name.to_string(), value);
    }

    pub fn assign(&mut self, name: &Token, value: LiteralValue) -> RuntimeResult<()> {
        let found = self.chain().find(|id| self.scopes[id.0].values.contains_key(&name.lexeme));
        match found {
            Some(id) => {
                self.scopes[id.0].values.insert(name.lexeme.clone(), value);
                Ok(())
            }
            None => Err(undefined_variable(name)),
        }
    }

    pub fn get(&self, name: &Token) -> RuntimeResult<LiteralValue> {
        self.chain()
            .find_map(|id| self.scopes[id.0].values.get(&name.lexeme))
            .cloned()
            .ok_or_else(|| undefined_variable(name))
    }

    // innermost first, ending at the global scope
    fn chain(&self) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(self.current), move |id| self.scopes[id.0].enclosing)
    }
}

fn undefined_variable(name: &Token) -> RuntimeError {
    RuntimeError::new(name, &format!("Undefined variable '{}'.", name.lexeme))
}
