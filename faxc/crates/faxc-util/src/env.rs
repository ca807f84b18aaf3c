//! Linked-chain lexical environments.
//!
//! Every phase that needs scoped name lookup — the type inferencer
//! (`name -> Type`), the IR builder (`name -> SSA value`), and the
//! interpreter (`name -> Obj`) — wants the same shape: a map plus a link
//! to the enclosing scope, searched outward on miss. Sharing one
//! implementation here means a `let`/function-call boundary is pushed the
//! same way everywhere.
//!
//! Frames are reference-counted and their bindings are interior-mutable,
//! so a frame can keep accumulating bindings (as the top level does for
//! successive declarations) while still being shared as the parent of
//! any number of child frames.

use std::cell::RefCell;
use std::rc::Rc;

use crate::{FxHashMap, Symbol};

/// One scope frame in a linked environment chain.
#[derive(Debug)]
pub struct Env<V> {
    bindings: RefCell<FxHashMap<Symbol, V>>,
    parent: Option<Rc<Env<V>>>,
}

impl<V: Clone> Env<V> {
    /// Creates a fresh root frame with no parent.
    pub fn root() -> Rc<Env<V>> {
        Rc::new(Env {
            bindings: RefCell::new(FxHashMap::default()),
            parent: None,
        })
    }

    /// Creates a child frame nested inside `parent`.
    pub fn child(parent: &Rc<Env<V>>) -> Rc<Env<V>> {
        Rc::new(Env {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(Rc::clone(parent)),
        })
    }

    /// Binds `name` in this frame, shadowing any outer binding.
    pub fn bind(&self, name: Symbol, value: V) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up `name`, searching outward through parent frames.
    pub fn lookup(&self, name: Symbol) -> Option<V> {
        if let Some(v) = self.bindings.borrow().get(&name) {
            return Some(v.clone());
        }
        self.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// True if `name` is bound in this frame specifically (not an outer one).
    pub fn is_bound_locally(&self, name: Symbol) -> bool {
        self.bindings.borrow().contains_key(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_in_same_frame() {
        let env: Rc<Env<i32>> = Env::root();
        env.bind(Symbol::intern("x"), 1);
        assert_eq!(env.lookup(Symbol::intern("x")), Some(1));
    }

    #[test]
    fn test_lookup_through_parent() {
        let root: Rc<Env<i32>> = Env::root();
        root.bind(Symbol::intern("x"), 1);
        let child = Env::child(&root);
        assert_eq!(child.lookup(Symbol::intern("x")), Some(1));
    }

    #[test]
    fn test_child_shadows_parent() {
        let root: Rc<Env<i32>> = Env::root();
        root.bind(Symbol::intern("x"), 1);
        let child = Env::child(&root);
        child.bind(Symbol::intern("x"), 2);
        assert_eq!(child.lookup(Symbol::intern("x")), Some(2));
        assert_eq!(root.lookup(Symbol::intern("x")), Some(1));
    }

    #[test]
    fn test_lookup_unbound_is_none() {
        let env: Rc<Env<i32>> = Env::root();
        assert_eq!(env.lookup(Symbol::intern("missing")), None);
    }

    #[test]
    fn test_is_bound_locally() {
        let root: Rc<Env<i32>> = Env::root();
        root.bind(Symbol::intern("x"), 1);
        let child = Env::child(&root);
        assert!(!child.is_bound_locally(Symbol::intern("x")));
        assert!(root.is_bound_locally(Symbol::intern("x")));
    }
}
