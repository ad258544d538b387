// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Lazy collaborator binding.
//!
//! A [`Binding`] constructs its collaborator on first use through an injected
//! factory and hands out the same instance for the rest of the run. It is
//! single-threaded; each test context owns its own bindings.

use std::fmt;

use once_cell::unsync::OnceCell;
use tracing::info;

use crate::error::{FixtureError, FixtureResult};

/// Factory producing a collaborator.
pub type Factory<T> = Box<dyn Fn() -> FixtureResult<Box<T>>>;

/// Handle to a collaborator created at most once, on first need.
pub struct Binding<T: ?Sized> {
    name: &'static str,
    factory: Factory<T>,
    handle: OnceCell<Box<T>>,
}

impl<T: ?Sized> Binding<T> {
    /// Create an unbound handle that will call `factory` on first use.
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> FixtureResult<Box<T>> + 'static,
    {
        Self {
            name,
            factory: Box::new(factory),
            handle: OnceCell::new(),
        }
    }

    /// Create a handle around an existing collaborator.
    pub fn bound(name: &'static str, collaborator: Box<T>) -> Self {
        Self {
            name,
            factory: Box::new(move || Err(FixtureError::binding(format!("{} is already bound", name)))),
            handle: OnceCell::with_value(collaborator),
        }
    }

    /// Returns the collaborator, constructing it if this is the first use.
    ///
    /// A failed construction is not cached; the next call tries again.
    pub fn get(&self) -> FixtureResult<&T> {
        let handle = self.handle.get_or_try_init(|| {
            info!("Binding {} collaborator", self.name);
            (self.factory)().map_err(|err| match err {
                FixtureError::Binding(_) => err,
                other => FixtureError::binding(format!("{} unavailable: {}", self.name, other)),
            })
        })?;
        Ok(handle.as_ref())
    }

    /// Whether the collaborator has been constructed.
    pub fn is_bound(&self) -> bool {
        self.handle.get().is_some()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    trait Counter {
        fn value(&self) -> u32;
    }

    struct Fixed(u32);

    impl Counter for Fixed {
        fn value(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_factory_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counted = calls.clone();
        let binding = Binding::<dyn Counter>::new("counter", move || {
            counted.set(counted.get() + 1);
            Ok(Box::new(Fixed(7)))
        });

        assert!(!binding.is_bound());
        for _ in 0..3 {
            assert_eq!(binding.get().unwrap().value(), 7);
        }
        assert!(binding.is_bound());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_factory_is_retried() {
        let calls = Rc::new(Cell::new(0));
        let counted = calls.clone();
        let binding = Binding::<dyn Counter>::new("flaky", move || {
            counted.set(counted.get() + 1);
            if counted.get() == 1 {
                Err(FixtureError::invalid_input("not yet"))
            } else {
                Ok(Box::new(Fixed(1)))
            }
        });

        let err = binding.get().err().expect("first construction fails");
        assert!(matches!(err, FixtureError::Binding(_)));
        assert!(err.to_string().contains("flaky"));

        assert_eq!(binding.get().unwrap().value(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_prebound_never_calls_factory() {
        let binding = Binding::<dyn Counter>::bound("fixed", Box::new(Fixed(3)));
        assert!(binding.is_bound());
        assert_eq!(binding.get().unwrap().value(), 3);
    }
}
