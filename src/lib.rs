//! # testsuite-rs
//!
//! A minimal test-orchestration engine: register test functions together
//! with setup, teardown and a per-test helper object, run them in order with
//! their output muffled, and watch a compact progress counter.
//!
//! Output a passing test prints (through [`say!`]) is thrown away; output a
//! failing test prints is shown together with its error, but only for the
//! first failure of each suite.
//!
//! ```no_run
//! use testsuite_rs::{check, global, say, Outcome};
//!
//! fn setup() {
//!     say!("Setting up the test.");
//! }
//!
//! fn arithmetic_works() -> Outcome {
//!     say!("Debugging output.");
//!     check!(1 + 1 == 2);
//!     Ok(())
//! }
//!
//! global::setup(setup).unwrap();
//! global::test(arithmetic_works).unwrap();
//! global::title("Unit test demonstration...");
//! global::run().unwrap();
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod expect;
pub mod global;
pub mod runner;
pub mod suite;
mod unwind;

pub use capture::OutputCapture;
pub use config::{ColorMode, Config};
pub use error::{AssertionError, Error, HelperMismatch, Outcome, Raised, Result};
pub use expect::{expect, Attempt};
pub use runner::{
    Color, ProgressSink, Runner, SinkEvent, Style, Summary, TerminalSink, TranscriptSink,
};
pub use suite::{
    Blank, HelperFactory, IntoLifecycle, IntoOutcome, LifecycleFunction, Role, Status, Suite,
    Test, TestResult,
};

/// Raise an [`AssertionError`] unless a condition holds
///
/// Unlike `assert!`, this returns the error instead of panicking, so it can
/// be used in any function whose error type converts from `AssertionError`.
///
/// ```
/// use testsuite_rs::{check, Outcome};
///
/// fn positive(value: i32) -> Outcome {
///     check!(value > 0, "{} is not positive", value);
///     Ok(())
/// }
///
/// assert!(positive(3).is_ok());
/// assert!(positive(-3).is_err());
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(::core::convert::From::from(
                $crate::AssertionError::new(concat!("check failed: ", stringify!($cond))),
            ));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err(::core::convert::From::from(
                $crate::AssertionError::new(::std::format!($($arg)+)),
            ));
        }
    };
}
