//! Per-test helper objects

use crate::error::{Error, Result};
use crate::unwind;
use std::any::Any;
use std::fmt;

/// The helper used when a suite doesn't register one
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blank;

type Constructor = Box<dyn Fn() -> std::result::Result<Box<dyn Any>, String>>;

/// Builds a fresh helper object for every test run
pub struct HelperFactory {
    name: String,
    constructor: Constructor,
}

impl HelperFactory {
    /// A factory for a type with a `Default` implementation
    pub fn of<H>() -> Self
    where
        H: Default + 'static,
    {
        HelperFactory {
            name: short_type_name::<H>(),
            constructor: Box::new(|| Ok::<_, String>(Box::new(H::default()) as Box<dyn Any>)),
        }
    }

    /// A factory from a fallible constructor
    pub fn from_fn<H, E, F>(name: impl Into<String>, constructor: F) -> Self
    where
        H: 'static,
        E: fmt::Display,
        F: Fn() -> std::result::Result<H, E> + 'static,
    {
        HelperFactory {
            name: name.into(),
            constructor: Box::new(move || {
                constructor()
                    .map(|helper| Box::new(helper) as Box<dyn Any>)
                    .map_err(|e| e.to_string())
            }),
        }
    }

    /// A factory of [`Blank`] helpers
    pub fn null() -> Self {
        Self::of::<Blank>()
    }

    /// Name of the helper type, used in error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construct a new helper
    ///
    /// Constructors that fail, by returning an error or by panicking, are
    /// reported as [`Error::Instantiation`].
    pub fn instantiate(&self) -> Result<Box<dyn Any>> {
        let instantiation_error = |reason: String| Error::Instantiation {
            helper: self.name.clone(),
            reason,
        };

        match unwind::catch(|| (self.constructor)()) {
            Ok(Ok(helper)) => Ok(helper),
            Ok(Err(reason)) => Err(instantiation_error(reason)),
            Err(panic) => Err(instantiation_error(panic.to_string())),
        }
    }
}

impl fmt::Debug for HelperFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperFactory")
            .field("name", &self.name)
            .finish()
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
