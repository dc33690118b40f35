//! Asserting that code raises a particular error

use crate::error::{AssertionError, Outcome};
use crate::suite::function::IntoOutcome;

/// Code given to [`expect`]: a closure returning `()` or a `Result`
pub trait Attempt {
    /// Run the code, returning what it raised
    fn attempt(self) -> Outcome;
}

impl<F, R> Attempt for F
where
    F: FnOnce() -> R,
    R: IntoOutcome,
{
    fn attempt(self) -> Outcome {
        self().into_outcome()
    }
}

/// Check that `body` raises an error of type `E`
///
/// Raising `E` is the success case. Finishing without raising anything, or
/// raising a different error, is an [`AssertionError`]; the other error is
/// not passed through.
///
/// ```
/// use testsuite_rs::{expect, Outcome};
///
/// fn parse_garbage() -> Outcome {
///     expect::<std::num::ParseIntError>(|| -> Outcome {
///         "garbage".parse::<u32>()?;
///         Ok(())
///     })?;
///     Ok(())
/// }
///
/// assert!(parse_garbage().is_ok());
/// ```
pub fn expect<E>(body: impl Attempt) -> Result<(), AssertionError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let expected = std::any::type_name::<E>();
    match body.attempt() {
        Ok(()) => Err(AssertionError::new(format!(
            "Expected '{}' to be raised, but nothing was.",
            expected
        ))),
        Err(raised) if raised.is::<E>() => Ok(()),
        Err(raised) => Err(AssertionError::new(format!(
            "Expected '{}' to be raised, but got '{}': {}",
            expected,
            raised.kind(),
            raised.error()
        ))),
    }
}
