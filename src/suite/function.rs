//! Wrapping user callbacks as lifecycle functions

use crate::error::{Error, HelperMismatch, Outcome, Raised, Result};
use std::any::Any;
use std::fmt;

/// What a lifecycle function is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Setup,
    Teardown,
    Test,
    Skipped,
    Null,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Setup => "Setup",
            Role::Teardown => "Teardown",
            Role::Test => "Test",
            Role::Skipped => "Skipped",
            Role::Null => "Null",
        };
        f.write_str(name)
    }
}

/// Return values a lifecycle callback may produce
pub trait IntoOutcome {
    /// Convert into `Ok(())` or the raised error
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Ok(())
    }
}

impl<E> IntoOutcome for std::result::Result<(), E>
where
    E: Into<Raised>,
{
    fn into_outcome(self) -> Outcome {
        self.map_err(Into::into)
    }
}

/// How a wrapped callback is invoked, decided once when it is wrapped
#[doc(hidden)]
pub enum Callable {
    NoContext(Box<dyn Fn() -> Outcome>),
    WithContext(Box<dyn Fn(&mut dyn Any) -> Outcome>),
}

/// A setup, teardown, test or skipped function with its arity fixed
pub struct LifecycleFunction {
    name: String,
    role: Role,
    callable: Callable,
}

impl LifecycleFunction {
    /// Wrap a callback, rejecting any that take more than one parameter
    pub fn wrap<F, Marker>(name: impl Into<String>, callback: F, role: Role) -> Result<Self>
    where
        F: IntoLifecycle<Marker>,
    {
        let name = name.into();
        let callable = callback.into_callable(&name, role)?;
        Ok(LifecycleFunction {
            name,
            role,
            callable,
        })
    }

    /// A function that does nothing
    pub fn null() -> Self {
        LifecycleFunction {
            name: "null".to_string(),
            role: Role::Null,
            callable: Callable::NoContext(Box::new(|| Ok(()))),
        }
    }

    /// Identifier the function was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the function is used for
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the callback takes the helper object
    pub fn uses_helper(&self) -> bool {
        matches!(self.callable, Callable::WithContext(_))
    }

    /// Invoke the callback, passing `context` only if it asked for one
    pub fn call(&self, context: &mut dyn Any) -> Outcome {
        match &self.callable {
            Callable::NoContext(f) => f(),
            Callable::WithContext(f) => f(context),
        }
    }
}

impl fmt::Debug for LifecycleFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleFunction")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("uses_helper", &self.uses_helper())
            .finish()
    }
}

/// Callbacks that can be registered as lifecycle functions
///
/// `Marker` only tells the implementations apart: it is the function
/// pointer type matching the callback's signature.
pub trait IntoLifecycle<Marker> {
    #[doc(hidden)]
    fn into_callable(self, name: &str, role: Role) -> Result<Callable>;

    /// Number of declared parameters
    fn arity(&self) -> usize;
}

impl<F, R> IntoLifecycle<fn() -> R> for F
where
    F: Fn() -> R + 'static,
    R: IntoOutcome,
{
    fn into_callable(self, _name: &str, _role: Role) -> Result<Callable> {
        Ok(Callable::NoContext(Box::new(move || self().into_outcome())))
    }

    fn arity(&self) -> usize {
        0
    }
}

impl<F, H, R> IntoLifecycle<fn(&mut H) -> R> for F
where
    F: Fn(&mut H) -> R + 'static,
    H: 'static,
    R: IntoOutcome,
{
    fn into_callable(self, name: &str, _role: Role) -> Result<Callable> {
        let function = name.to_string();
        Ok(Callable::WithContext(Box::new(move |context: &mut dyn Any| {
            match context.downcast_mut::<H>() {
                Some(helper) => self(helper).into_outcome(),
                None => Err(HelperMismatch {
                    function: function.clone(),
                    expected: std::any::type_name::<H>(),
                }
                .into()),
            }
        })))
    }

    fn arity(&self) -> usize {
        1
    }
}

macro_rules! reject_arity {
    ($arity:expr; $($param:ident),+) => {
        impl<F, R, $($param),+> IntoLifecycle<fn($($param),+) -> R> for F
        where
            F: Fn($($param),+) -> R,
        {
            fn into_callable(self, name: &str, role: Role) -> Result<Callable> {
                Err(Error::arity_error(role, name, $arity))
            }

            fn arity(&self) -> usize {
                $arity
            }
        }
    };
}

reject_arity!(2; A, B);
reject_arity!(3; A, B, C);
reject_arity!(4; A, B, C, D);

/// A function's identifier as written in source
///
/// For fn items this is the item name; closures have none and come back as
/// `closure`.
pub(crate) fn function_name<F>() -> String {
    let full = std::any::type_name::<F>();
    match full.rsplit("::").next() {
        Some(last) if !last.starts_with('{') && !last.is_empty() => last.to_string(),
        _ => "closure".to_string(),
    }
}
