//! Tests for what the runner shows while and after running a suite

use pretty_assertions::assert_eq;
use testsuite_rs::runner::text;
use testsuite_rs::{
    check, say, AssertionError, Error, Outcome, Runner, Suite, Summary, TerminalSink,
    TranscriptSink,
};

#[derive(Default)]
struct State {
    message: Option<String>,
}

fn setup_globally() {
    say!("Setting up globally.");
}

fn teardown_globally() {
    say!("Tearing down globally.");
}

fn setup_with_helper(helper: &mut State) {
    say!("Setting up a helper object.");
    helper.message = Some("Using a helper object.".to_string());
}

fn teardown_with_helper(helper: &mut State) {
    say!("Tearing down a helper object.");
    helper.message = None;
}

fn print_status() {
    say!("Successful test executed.");
}

fn print_status_with_helper(helper: &mut State) -> Outcome {
    check!(helper.message.is_some(), "setup did not run");
    say!("{}", helper.message.as_deref().unwrap_or_default());
    say!("Successful test executed.");
    Ok(())
}

fn raise_exception() -> Outcome {
    say!("Unsuccessful test executed.");
    let _: u32 = "zero".parse()?;
    Ok(())
}

fn raise_exception_with_helper(helper: &mut State) -> Outcome {
    say!("{}", helper.message.as_deref().unwrap_or_default());
    say!("Unsuccessful test executed.");
    Err(AssertionError::new("helper test failed").into())
}

/// Run a suite on an in-memory sink, returning the final screen and raw stream
fn run_suite(suite: &mut Suite) -> (Summary, String, String) {
    let mut runner = Runner::with_sink(TranscriptSink::new());
    let summary = runner.run(suite).unwrap();
    let sink = runner.into_sink();
    println!("{}", text::indent(sink.screen().trim(), "> "));
    (summary, sink.screen().to_string(), sink.raw().to_string())
}

#[test]
fn test_successful_suite() {
    let mut suite = Suite::new("Testing for success...");
    suite.setup(setup_globally).unwrap();
    suite.teardown(teardown_globally).unwrap();
    for _ in 0..3 {
        suite.test(print_status).unwrap();
    }

    let (summary, transcript, _) = run_suite(&mut suite);

    assert!(summary.is_success());
    assert!(transcript.contains("Testing for success..."));
    assert!(transcript.contains("(3/3)"));
    assert!(!transcript.contains("Setting up globally."));
    assert!(!transcript.contains("Successful test executed."));
    assert!(!transcript.contains("Tearing down globally."));
    assert!(!transcript.contains("Skipped"));
}

#[test]
fn test_successful_suite_with_helper() {
    let mut suite = Suite::new("Testing for success with helper...");
    suite.helper::<State>();
    suite.setup(setup_with_helper).unwrap();
    suite.teardown(teardown_with_helper).unwrap();
    for _ in 0..3 {
        suite.test(print_status_with_helper).unwrap();
    }

    let (summary, transcript, _) = run_suite(&mut suite);

    assert_eq!(summary.successes, 3);
    assert!(transcript.contains("(3/3)"));
    assert!(!transcript.contains("Setting up a helper object."));
    assert!(!transcript.contains("Using a helper object."));
    assert!(!transcript.contains("Tearing down a helper object."));
}

#[test]
fn test_failed_suite_stops_on_error() {
    let mut suite = Suite::new("Testing for failure...").stop_on_error(true);
    suite.setup(setup_globally).unwrap();
    suite.teardown(teardown_globally).unwrap();
    suite.test(print_status).unwrap();
    suite.test(raise_exception).unwrap();
    suite.test(print_status).unwrap();

    let (summary, transcript, _) = run_suite(&mut suite);

    assert_eq!(summary.completed, 2);
    assert!(transcript.contains("Testing for failure..."));
    assert!(transcript.contains("(2/3)"));
    assert!(transcript.contains("Test failed: Raise Exception"));
    assert!(transcript.contains("Setting up globally."));
    assert!(transcript.contains("Unsuccessful test executed."));
    assert!(transcript.contains("ParseIntError"));
    assert!(!transcript.contains("Tearing down globally."));
    assert!(!transcript.contains("Successful test executed."));
}

#[test]
fn test_failed_suite_with_helper() {
    let mut suite = Suite::new("Testing for failure with helper...").stop_on_error(false);
    suite.helper::<State>();
    suite.setup(setup_with_helper).unwrap();
    suite.teardown(teardown_with_helper).unwrap();
    suite.test(print_status_with_helper).unwrap();
    suite.test(raise_exception_with_helper).unwrap();
    suite.test(print_status_with_helper).unwrap();

    let (summary, transcript, _) = run_suite(&mut suite);

    assert_eq!(summary.failures, 1);
    assert!(transcript.contains("(3/3)"));
    assert!(transcript.contains("Test failed: Raise Exception With Helper"));
    assert_eq!(transcript.matches("Setting up a helper object.").count(), 1);
    assert_eq!(transcript.matches("Using a helper object.").count(), 1);
    assert!(!transcript.contains("Tearing down a helper object."));
    assert!(!transcript.contains("Successful test executed."));
}

#[test]
fn test_skips_are_reported() {
    let mut suite = Suite::new("Testing skips...");
    suite.test(print_status).unwrap();
    suite.skip(print_status).unwrap();
    suite.skip(raise_exception).unwrap();

    let (_, transcript, _) = run_suite(&mut suite);
    assert!(transcript.contains("Skipped 2 tests."));

    let mut suite = Suite::new("Testing one skip...");
    suite.test(print_status).unwrap();
    suite.skip(print_status).unwrap();
    let (_, transcript, _) = run_suite(&mut suite);
    assert!(transcript.contains("Skipped 1 test."));
}

#[test]
fn test_only_first_failure_is_detailed() {
    fn first_broken() -> Outcome {
        say!("first broken output");
        Err(AssertionError::new("first").into())
    }

    fn second_broken() -> Outcome {
        say!("second broken output");
        Err(AssertionError::new("second").into())
    }

    let mut suite = Suite::new("Many failures").stop_on_error(false);
    suite.test(first_broken).unwrap().test(second_broken).unwrap();

    let (summary, transcript, _) = run_suite(&mut suite);
    assert_eq!(summary.failures, 2);
    assert_eq!(transcript.matches("Test failed:").count(), 1);
    assert!(transcript.contains("first broken output"));
    assert!(!transcript.contains("second broken output"));
}

struct Unreachable;

impl Default for Unreachable {
    fn default() -> Self {
        panic!("no database available")
    }
}

#[test]
fn test_helper_failure_stops_the_runner() {
    let mut suite = Suite::new("Broken helper");
    suite.helper::<Unreachable>();
    suite.test(print_status).unwrap();

    let mut runner = Runner::with_sink(TranscriptSink::new());
    let error = runner.run(&mut suite).unwrap_err();
    match &error {
        Error::Instantiation { helper, reason } => {
            assert_eq!(helper, "Unreachable");
            assert!(reason.contains("no database available"), "{}", reason);
        }
        other => panic!("expected an instantiation error, got {:?}", other),
    }

    let sink = runner.into_sink();
    assert_eq!(sink.screen(), "Broken helper (0/1)");
    assert!(!sink.raw().contains("Test failed:"));
    assert!(!sink.raw().contains("Successful test executed."));
    assert!(!suite.is_finished());
}

mod scenario {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Fixture {
        x: Option<u32>,
    }

    fn set_x(fixture: &mut Fixture) {
        fixture.x = Some(1);
    }

    fn check_and_clear_x(fixture: &mut Fixture) -> Outcome {
        check!(fixture.x == Some(1));
        fixture.x = None;
        Ok(())
    }

    fn test_1() {
        say!("Debugging output for 1.");
    }

    fn test_2() -> Outcome {
        say!("Debugging output for 2.");
        Err(AssertionError::new("second test fails").into())
    }

    fn test_3() {
        say!("Debugging output for 3.");
    }

    #[test]
    fn test_setup_teardown_and_three_tests() {
        let mut suite = Suite::new("Scenario").stop_on_error(false);
        suite.helper::<Fixture>();
        suite.setup(set_x).unwrap().teardown(check_and_clear_x).unwrap();
        suite.test(test_1).unwrap().test(test_2).unwrap().test(test_3).unwrap();

        let (summary, screen, raw) = run_suite(&mut suite);

        let outcomes: Vec<bool> = suite.iter().unwrap().map(|r| r.is_success()).collect();
        assert_eq!(outcomes, vec![true, false, true]);
        assert!(suite.results().unwrap()[1].traceback().contains("AssertionError"));
        assert_eq!(summary.completed, 3);

        let first = raw.find("(1/3)").unwrap();
        let second = raw.find("(2/3)").unwrap();
        let third = raw.find("(3/3)").unwrap();
        assert!(first < second && second < third);

        assert_eq!(screen.matches("Test failed: Test 2").count(), 1);
        assert_eq!(raw.matches("Debugging output for 2.").count(), 1);
        assert!(!raw.contains("Debugging output for 1."));
        assert!(!raw.contains("Debugging output for 3."));
        assert!(screen.starts_with("Scenario (3/3)\n"));
    }
}

#[test]
fn test_terminal_runner_can_be_captured() {
    let mut suite = Suite::new("Captured terminal run");
    suite.test(print_status).unwrap();

    let (summary, transcript) = testsuite_rs::capture::capture(|| {
        let mut runner = Runner::with_sink(TerminalSink::new(testsuite_rs::ColorMode::Never));
        runner.run(&mut suite)
    });

    assert!(summary.unwrap().is_success());
    assert!(transcript.contains("Captured terminal run"));
    assert!(transcript.contains("(1/1)"));
    assert!(!transcript.contains("Successful test executed."));
}

#[test]
fn test_several_suites_run_in_order() {
    let mut first = Suite::new("First suite");
    first.test(print_status).unwrap();
    let mut second = Suite::new("Second suite");
    second.test(print_status).unwrap().test(print_status).unwrap();

    let mut runner = Runner::with_sink(TranscriptSink::new());
    let summaries = runner.run_all(&mut [&mut first, &mut second]).unwrap();

    let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["First suite", "Second suite"]);
    assert_eq!(summaries[1].total, 2);

    let screen = runner.sink().screen();
    assert!(screen.find("First suite").unwrap() < screen.find("Second suite").unwrap());
}
