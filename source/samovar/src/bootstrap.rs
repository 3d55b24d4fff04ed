//! A small type-keyed registry shared across the bootstrap run.
//!
//! The engine registers a binder factory here so later bootstrap
//! participants can bind properties against the fully processed tree.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

/// Instance lifecycle for registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// One instance, created on first access.
    Singleton,
    /// A fresh instance per access.
    Prototype,
}

struct Registration {
    scope: Scope,
    factory: Box<dyn Fn() -> Box<dyn Any>>,
    singleton: Option<Box<dyn Any>>,
}

#[derive(Default)]
pub struct BootstrapContext {
    registrations: RefCell<HashMap<TypeId, Registration>>,
}

impl BootstrapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `T`, replacing any earlier registration.
    pub fn register<T: 'static>(&self, scope: Scope, factory: impl Fn() -> T + 'static) {
        self.registrations.borrow_mut().insert(
            TypeId::of::<T>(),
            Registration {
                scope,
                factory: Box::new(move || Box::new(factory())),
                singleton: None,
            },
        );
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.registrations
            .borrow()
            .contains_key(&TypeId::of::<T>())
    }

    /// Fetch an instance of `T`, honouring the registered scope.
    pub fn get<T: 'static + Clone>(&self) -> Option<T> {
        let mut registrations = self.registrations.borrow_mut();
        let registration = registrations.get_mut(&TypeId::of::<T>())?;
        match registration.scope {
            Scope::Prototype => (registration.factory)().downcast::<T>().ok().map(|b| *b),
            Scope::Singleton => {
                if registration.singleton.is_none() {
                    registration.singleton = Some((registration.factory)());
                }
                registration
                    .singleton
                    .as_ref()
                    .and_then(|instance| instance.downcast_ref::<T>())
                    .cloned()
            }
        }
    }
}
