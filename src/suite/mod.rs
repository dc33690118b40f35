//! Suites of tests sharing setup, teardown and helper bindings

pub mod function;
pub mod helper;

// Re-export public types
pub use function::{IntoLifecycle, IntoOutcome, LifecycleFunction, Role};
pub use helper::{Blank, HelperFactory};
pub use test::{Status, Test, TestResult};

use crate::config::Config;
use crate::error::{Error, Result};
use function::function_name;
use std::any::Any;
use std::rc::Rc;

/// An ordered collection of tests
///
/// Tests run in the order they were registered. Each test is bound to the
/// setup, teardown and helper that were registered *before* it; registering a
/// new setup afterwards only affects tests registered later.
///
/// # Examples
///
/// ```
/// use testsuite_rs::{check, say, Suite, TranscriptSink, Runner};
///
/// #[derive(Default)]
/// struct Counter {
///     value: u32,
/// }
///
/// fn start_at_one(counter: &mut Counter) {
///     counter.value = 1;
/// }
///
/// fn counter_starts_at_one(counter: &mut Counter) -> testsuite_rs::Outcome {
///     say!("value is {}", counter.value);
///     check!(counter.value == 1);
///     Ok(())
/// }
///
/// let mut suite = Suite::new("Counting...");
/// suite
///     .helper::<Counter>()
///     .setup(start_at_one)?
///     .test(counter_starts_at_one)?;
///
/// let mut runner = Runner::with_sink(TranscriptSink::new());
/// let summary = runner.run(&mut suite)?;
/// assert!(summary.is_success());
/// # Ok::<(), testsuite_rs::Error>(())
/// ```
pub struct Suite {
    title: String,
    stop_on_error: bool,
    capture_stdio: bool,
    finished: bool,
    tests: Vec<Rc<Test>>,
    skips: Vec<LifecycleFunction>,
    results: Vec<Rc<TestResult>>,
    setup: Rc<LifecycleFunction>,
    teardown: Rc<LifecycleFunction>,
    helper: Rc<HelperFactory>,
}

impl Suite {
    /// Create an empty suite, taking `stop_on_error` from the environment
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_config(title, &Config::from_env())
    }

    /// Create an empty suite with explicit settings
    pub fn with_config(title: impl Into<String>, config: &Config) -> Self {
        Suite {
            title: title.into(),
            stop_on_error: config.stop_on_error,
            capture_stdio: config.capture_stdio,
            finished: false,
            tests: Vec::new(),
            skips: Vec::new(),
            results: Vec::new(),
            setup: Rc::new(LifecycleFunction::null()),
            teardown: Rc::new(LifecycleFunction::null()),
            helper: Rc::new(HelperFactory::null()),
        }
    }

    /// Set whether the suite stops at the first failing test
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    pub fn set_stop_on_error(&mut self, stop: bool) {
        self.stop_on_error = stop;
    }

    /// Set whether tests capture stdout and stderr as well as the output channel
    pub fn capture_stdio(mut self, capture: bool) -> Self {
        self.capture_stdio = capture;
        self
    }

    /// Register a test, named after the function
    pub fn test<F, Marker>(&mut self, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.test_named(function_name::<F>(), function)
    }

    /// Register a test under an explicit identifier
    pub fn test_named<F, Marker>(&mut self, name: impl Into<String>, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        let function = LifecycleFunction::wrap(name, function, Role::Test)?;
        tracing::debug!(suite = %self.title, test = function.name(), "registered test");
        let test = Test::new(
            function,
            Rc::clone(&self.setup),
            Rc::clone(&self.teardown),
            Rc::clone(&self.helper),
        );
        self.tests.push(Rc::new(test));
        Ok(self)
    }

    /// Record a test that will not be run
    pub fn skip<F, Marker>(&mut self, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.skip_named(function_name::<F>(), function)
    }

    /// Record a skipped test under an explicit identifier
    pub fn skip_named<F, Marker>(&mut self, name: impl Into<String>, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        let skip = LifecycleFunction::wrap(name, function, Role::Skipped)?;
        tracing::debug!(suite = %self.title, test = skip.name(), "registered skip");
        self.skips.push(skip);
        Ok(self)
    }

    /// Use `function` as setup for tests registered from now on
    pub fn setup<F, Marker>(&mut self, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.setup_named(function_name::<F>(), function)
    }

    /// Use `function` as setup under an explicit identifier
    pub fn setup_named<F, Marker>(&mut self, name: impl Into<String>, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.setup = Rc::new(LifecycleFunction::wrap(name, function, Role::Setup)?);
        Ok(self)
    }

    /// Use `function` as teardown for tests registered from now on
    pub fn teardown<F, Marker>(&mut self, function: F) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.teardown_named(function_name::<F>(), function)
    }

    /// Use `function` as teardown under an explicit identifier
    pub fn teardown_named<F, Marker>(
        &mut self,
        name: impl Into<String>,
        function: F,
    ) -> Result<&mut Self>
    where
        F: IntoLifecycle<Marker>,
    {
        self.teardown = Rc::new(LifecycleFunction::wrap(name, function, Role::Teardown)?);
        Ok(self)
    }

    /// Give tests registered from now on a fresh `H` each run
    pub fn helper<H>(&mut self) -> &mut Self
    where
        H: Default + 'static,
    {
        self.helper_factory(HelperFactory::of::<H>())
    }

    /// Give tests registered from now on helpers built by `factory`
    pub fn helper_factory(&mut self, factory: HelperFactory) -> &mut Self {
        self.helper = Rc::new(factory);
        self
    }

    /// Run every test in order
    ///
    /// `callback` sees each result before the next test starts. With
    /// `stop_on_error`, the first failure ends the run and the remaining tests
    /// are neither run nor recorded. Running a suite again replaces the
    /// results of the previous run.
    #[tracing::instrument(skip_all, fields(suite = %self.title, tests = self.tests.len()))]
    pub fn run(&mut self, mut callback: impl FnMut(&Rc<TestResult>)) -> Result<()> {
        if self.tests.is_empty() {
            return Err(Error::no_tests(&self.title));
        }

        if !self.results.is_empty() {
            tracing::debug!(previous = self.results.len(), "discarding results of the previous run");
        }
        self.results.clear();
        self.finished = false;

        for test in &self.tests {
            let result = Rc::new(test.run_capturing(self.capture_stdio)?);
            callback(&result);
            let failed = result.is_failure();
            self.results.push(result);

            if failed && self.stop_on_error {
                tracing::debug!("stopping at first failure");
                break;
            }
        }

        self.finished = true;
        Ok(())
    }

    /// Whether the last run went through to completion
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rename the suite
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Whether the first failing test ends a run
    pub fn stops_on_error(&self) -> bool {
        self.stop_on_error
    }

    /// Whether tests capture stdout and stderr
    pub fn captures_stdio(&self) -> bool {
        self.capture_stdio
    }

    /// Number of registered tests
    pub fn num_tests(&self) -> usize {
        self.tests.len()
    }

    /// Number of skipped tests
    pub fn num_skips(&self) -> usize {
        self.skips.len()
    }

    /// Registered tests in order
    pub fn tests(&self) -> &[Rc<Test>] {
        &self.tests
    }

    /// Results of a finished run
    pub fn results(&self) -> Result<&[Rc<TestResult>]> {
        if !self.finished {
            return Err(Error::Unfinished {
                suite: self.title.clone(),
            });
        }
        Ok(&self.results)
    }

    /// Iterate over the results of a finished run
    pub fn iter(&self) -> Result<std::slice::Iter<'_, Rc<TestResult>>> {
        Ok(self.results()?.iter())
    }

    /// The setup new tests will be bound to
    pub fn setup_function(&self) -> &LifecycleFunction {
        &self.setup
    }

    /// The teardown new tests will be bound to
    pub fn teardown_function(&self) -> &LifecycleFunction {
        &self.teardown
    }

    /// The helper factory new tests will be bound to
    pub fn helper_factory_ref(&self) -> &HelperFactory {
        &self.helper
    }

    /// A fresh instance of the current helper
    pub fn instantiate_helper(&self) -> Result<Box<dyn Any>> {
        self.helper.instantiate()
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("title", &self.title)
            .field("stop_on_error", &self.stop_on_error)
            .field("capture_stdio", &self.capture_stdio)
            .field("finished", &self.finished)
            .field("tests", &self.tests.len())
            .field("skips", &self.skips.len())
            .field("results", &self.results.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssertionError;

    fn passes() {}

    fn fails() -> std::result::Result<(), AssertionError> {
        Err(AssertionError::new("nope"))
    }

    fn first_setup() {
        crate::say!("first setup");
    }

    fn second_setup() {
        crate::say!("second setup");
    }

    #[test]
    fn tests_keep_the_setup_they_were_registered_with() {
        let mut suite = Suite::new("Bindings")
            .stop_on_error(false)
            .capture_stdio(false);
        suite.setup(first_setup).unwrap().test_named("early", fails).unwrap();
        suite.setup(second_setup).unwrap().test_named("late", fails).unwrap();

        suite.run(|_| {}).unwrap();
        let results = suite.results().unwrap();
        assert_eq!(results[0].output(), "first setup\n");
        assert_eq!(results[1].output(), "second setup\n");
        assert_eq!(suite.setup_function().name(), "second_setup");
    }

    #[derive(Default)]
    struct Original {
        label: &'static str,
    }

    #[derive(Default)]
    struct Replacement;

    fn first_teardown() {
        crate::say!("first teardown");
    }

    fn second_teardown() {
        crate::say!("second teardown");
    }

    fn uses_original(helper: &mut Original) {
        crate::say!("original helper{}", helper.label);
    }

    #[test]
    fn tests_keep_the_teardown_and_helper_they_were_registered_with() {
        let mut suite = Suite::new("Later bindings")
            .stop_on_error(false)
            .capture_stdio(false);
        suite.helper::<Original>();
        suite.teardown(first_teardown).unwrap();
        suite.test(quiet).unwrap();
        suite.test(uses_original).unwrap();

        suite.teardown(second_teardown).unwrap();
        suite.helper::<Replacement>();
        suite.test(quiet).unwrap();

        suite.run(|_| {}).unwrap();
        let results = suite.results().unwrap();
        assert_eq!(results[0].output(), "first teardown\n");
        assert!(results[1].is_success(), "{}", results[1].traceback());
        assert_eq!(results[1].output(), "original helper\nfirst teardown\n");
        assert_eq!(results[2].output(), "second teardown\n");

        assert_eq!(suite.tests()[1].helper().name(), "Original");
        assert_eq!(suite.tests()[2].helper().name(), "Replacement");
        assert_eq!(suite.tests()[1].teardown().name(), "first_teardown");
    }

    fn quiet() {}

    #[test]
    fn running_again_replaces_previous_results() {
        let mut suite = Suite::new("Twice").stop_on_error(false);
        suite.test(passes).unwrap().test(passes).unwrap();

        suite.run(|_| {}).unwrap();
        let first: Vec<Rc<TestResult>> = suite.results().unwrap().to_vec();

        let mut callbacks = 0;
        suite.run(|_| callbacks += 1).unwrap();
        let second = suite.results().unwrap();

        assert_eq!(callbacks, 2);
        assert_eq!(second.len(), suite.num_tests());
        assert!(suite.is_finished());
        assert!(!Rc::ptr_eq(&first[0], &second[0]));
    }

    #[test]
    fn stop_on_error_halts_the_run() {
        let mut suite = Suite::new("Halting").stop_on_error(true);
        suite.test(passes).unwrap().test(fails).unwrap().test(passes).unwrap();
        suite.run(|_| {}).unwrap();
        assert!(suite.is_finished());
        assert_eq!(suite.results().unwrap().len(), 2);
    }

    #[test]
    fn results_are_unavailable_until_finished() {
        let mut suite = Suite::new("Pending");
        suite.test(passes).unwrap();
        assert!(matches!(suite.results(), Err(Error::Unfinished { .. })));
        assert!(suite.iter().is_err());
        suite.run(|_| {}).unwrap();
        assert_eq!(suite.iter().unwrap().count(), 1);
    }

    #[test]
    fn callback_sees_every_result_in_order() {
        let mut suite = Suite::new("Order").stop_on_error(false);
        suite.test(passes).unwrap().test(fails).unwrap().test(passes).unwrap();
        let mut seen = Vec::new();
        suite.run(|result| seen.push(result.is_success())).unwrap();
        assert_eq!(seen, vec![true, false, true]);
    }

    #[test]
    fn duplicates_are_distinct_tests() {
        let mut suite = Suite::new("Duplicates");
        suite.test(passes).unwrap().test(passes).unwrap();
        assert_eq!(suite.num_tests(), 2);
        assert!(!Rc::ptr_eq(&suite.tests()[0], &suite.tests()[1]));
        assert_eq!(suite.tests()[0].title(), "Passes");
    }
}
