//! The default suite
//!
//! Small programs often need exactly one suite. This module keeps one per
//! thread, titled [`DEFAULT_TITLE`], created the first time any function
//! here is called. [`run`] takes that suite out, runs it on a terminal
//! [`Runner`], and drops it; a fresh default suite takes its place for
//! whatever is registered afterwards.

use crate::error::Result;
use crate::runner::{Runner, Summary};
use crate::suite::{IntoLifecycle, Suite};
use std::cell::RefCell;

/// Title of the default suite
pub const DEFAULT_TITLE: &str = "Running all tests...";

thread_local! {
    static DEFAULT_SUITE: RefCell<Suite> = RefCell::new(Suite::new(DEFAULT_TITLE));
}

fn with_default<T>(f: impl FnOnce(&mut Suite) -> T) -> T {
    DEFAULT_SUITE.with(|suite| f(&mut suite.borrow_mut()))
}

/// Register a test on the default suite
pub fn test<F, Marker>(function: F) -> Result<()>
where
    F: IntoLifecycle<Marker>,
{
    with_default(|suite| suite.test(function).map(|_| ()))
}

/// Register a test on the default suite under an explicit identifier
pub fn test_named<F, Marker>(name: &str, function: F) -> Result<()>
where
    F: IntoLifecycle<Marker>,
{
    with_default(|suite| suite.test_named(name, function).map(|_| ()))
}

/// Record a skipped test on the default suite
pub fn skip<F, Marker>(function: F) -> Result<()>
where
    F: IntoLifecycle<Marker>,
{
    with_default(|suite| suite.skip(function).map(|_| ()))
}

/// Set the default suite's setup for tests registered afterwards
pub fn setup<F, Marker>(function: F) -> Result<()>
where
    F: IntoLifecycle<Marker>,
{
    with_default(|suite| suite.setup(function).map(|_| ()))
}

/// Set the default suite's teardown for tests registered afterwards
pub fn teardown<F, Marker>(function: F) -> Result<()>
where
    F: IntoLifecycle<Marker>,
{
    with_default(|suite| suite.teardown(function).map(|_| ()))
}

/// Set the default suite's helper type for tests registered afterwards
pub fn helper<H>()
where
    H: Default + 'static,
{
    with_default(|suite| {
        suite.helper::<H>();
    })
}

/// Change the default suite's title
pub fn title(title: &str) {
    with_default(|suite| suite.set_title(title))
}

/// Run the default suite on the terminal
pub fn run() -> Result<Summary> {
    let mut suite = with_default(|suite| std::mem::replace(suite, Suite::new(DEFAULT_TITLE)));
    Runner::new().run(&mut suite)
}

/// Run explicit suites on the terminal, leaving the default suite alone
pub fn run_suites(suites: &mut [&mut Suite]) -> Result<Vec<Summary>> {
    Runner::new().run_all(suites)
}
