//! Demonstration of the default suite
//!
//! None of the output printed with `say!` below is shown unless a test fails.
//! Try returning an error from one of the tests to see it.

use std::thread;
use std::time::Duration;
use testsuite_rs::{expect, global, say, Outcome};

#[derive(Debug, thiserror::Error)]
#[error("attempt to divide by zero")]
struct ZeroDivisionError;

fn divide(a: u32, b: u32) -> Result<u32, ZeroDivisionError> {
    a.checked_div(b).ok_or(ZeroDivisionError)
}

fn setup() {
    say!("Setting up the test.");
}

fn teardown() {
    say!("Tearing down the test.");
}

fn test_1() {
    say!("Debugging output for 1.");
    thread::sleep(Duration::from_secs(1));
}

fn test_2() {
    say!("Debugging output for 2.");
    thread::sleep(Duration::from_secs(1));
}

// An error is expected here; the test fails if divide() succeeds.
fn test_3() -> Outcome {
    expect::<ZeroDivisionError>(|| divide(1, 0).map(|_| ()))?;
    thread::sleep(Duration::from_secs(1));
    Ok(())
}

fn main() -> Result<(), testsuite_rs::Error> {
    global::setup(setup)?;
    global::teardown(teardown)?;
    global::test(test_1)?;
    global::test(test_2)?;
    global::test(test_3)?;

    global::title("Unit test demonstration...");
    let summary = global::run()?;
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
