//! Error types for testsuite-rs

use crate::suite::function::Role;
use std::fmt;
use thiserror::Error;

/// Result type alias for testsuite operations
pub type Result<T> = std::result::Result<T, Error>;

/// What a lifecycle callback returns: `Ok(())` or the error it raised
pub type Outcome = std::result::Result<(), Raised>;

/// Main error type for testsuite operations
///
/// These are mistakes in how a suite was put together, not test outcomes.
/// Errors raised by setup, test and teardown functions never show up here;
/// they become failed [`TestResult`](crate::TestResult)s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A lifecycle function takes an unsupported number of parameters
    #[error("{role} function {name}() must accept either 0 or 1 arguments, not {arity}.")]
    Arity {
        role: Role,
        name: String,
        arity: usize,
    },

    /// The registered helper type could not be constructed
    #[error("Unable to instantiate a {helper}() helper: {reason}")]
    Instantiation { helper: String, reason: String },

    /// A suite was run without any registered tests
    #[error("{message}")]
    NoTests { suite: String, message: String },

    /// Results were read before the suite finished running
    #[error("The '{suite}' suite has not finished running.")]
    Unfinished { suite: String },

    /// IO error occurred while rendering progress
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an arity error
    pub fn arity_error(role: Role, name: impl Into<String>, arity: usize) -> Self {
        Error::Arity {
            role,
            name: name.into(),
            arity,
        }
    }

    /// Create a no-tests error with the standard explanation
    pub fn no_tests(suite: impl Into<String>) -> Self {
        let suite = suite.into();
        let opening = format!("The '{}' suite does not have any ", suite);
        let message = crate::runner::text::wrap(&[
            opening.as_str(),
            "tests to run. If you are using your own test suite, ",
            "you can get this error by forgetting to pass it into ",
            "the run() function.",
        ]);
        Error::NoTests { suite, message }
    }
}

/// An assertion made by a test did not hold
///
/// Raised by [`expect`](crate::expect()) and [`check!`](crate::check).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    /// Create an assertion error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failed assertion's message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A callback asked for a helper of a different type than the suite provides
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{function}() expects a {expected} helper, but the suite provides something else")]
pub struct HelperMismatch {
    pub function: String,
    pub expected: &'static str,
}

/// An error raised by a lifecycle callback
///
/// Any `std::error::Error` converts into `Raised` with `?`, remembering the
/// type it was raised as. This deliberately does not implement
/// `std::error::Error` itself so the blanket conversion stays coherent.
pub struct Raised {
    kind: &'static str,
    error: anyhow::Error,
}

impl Raised {
    /// Wrap an `anyhow::Error`, which has no more specific kind
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Raised {
            kind: "anyhow::Error",
            error,
        }
    }

    /// Type name of the raised error
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether the raised error is an `E`
    pub fn is<E>(&self) -> bool
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.error.is::<E>()
    }

    /// The raised error as an `E`, if it is one
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    /// The underlying error
    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }
}

impl<E> From<E> for Raised
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Raised {
            kind: std::any::type_name::<E>(),
            error: anyhow::Error::new(error),
        }
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.error)
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.error)
    }
}
