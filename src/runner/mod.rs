//! Running suites and reporting their progress

pub mod sink;
pub mod text;

pub use sink::{Color, ProgressSink, SinkEvent, Style, TerminalSink, TranscriptSink};

use crate::config::Config;
use crate::error::Result;
use crate::suite::test::TestResult;
use crate::suite::Suite;
use std::rc::Rc;

/// Totals for one suite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub total: usize,
    pub completed: usize,
    pub successes: usize,
    pub failures: usize,
    pub skips: usize,
}

impl Summary {
    /// Whether every test that ran passed
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }
}

/// Per-suite counters, reset at the start of every suite
struct Tally {
    total: usize,
    completed: usize,
    successes: usize,
    failures: usize,
    first_failure: Option<Rc<TestResult>>,
}

impl Tally {
    fn new(total: usize) -> Self {
        Tally {
            total,
            completed: 0,
            successes: 0,
            failures: 0,
            first_failure: None,
        }
    }

    fn record(&mut self, result: &Rc<TestResult>) {
        if result.is_success() {
            self.successes += 1;
        } else {
            self.failures += 1;
            if self.first_failure.is_none() {
                self.first_failure = Some(Rc::clone(result));
            }
        }
        self.completed += 1;
    }
}

/// Drives suites one after another and draws their progress
///
/// Each suite gets a header with its title followed by a `(done/total)`
/// counter that is redrawn after every test: green while everything passes,
/// red from the first failure on. Once a suite finishes, the captured output
/// and trace of its first failure are printed. Later failures are counted but
/// not shown.
pub struct Runner<S: ProgressSink = TerminalSink> {
    sink: S,
}

impl Runner<TerminalSink> {
    /// A runner drawing on the terminal, configured from the environment
    pub fn new() -> Self {
        Self::with_config(&Config::from_env())
    }

    /// A runner drawing on the terminal with explicit settings
    pub fn with_config(config: &Config) -> Self {
        Runner {
            sink: TerminalSink::new(config.color),
        }
    }
}

impl Default for Runner<TerminalSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ProgressSink> Runner<S> {
    /// A runner drawing on the given sink
    pub fn with_sink(sink: S) -> Self {
        Runner { sink }
    }

    /// The sink progress is drawn on
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the runner, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one suite
    #[tracing::instrument(skip_all, fields(suite = %suite.title()))]
    pub fn run(&mut self, suite: &mut Suite) -> Result<Summary> {
        if suite.num_tests() == 0 {
            // Fail before drawing anything.
            return Err(crate::Error::no_tests(suite.title()));
        }

        let header = format!("{} ", suite.title());
        let mut tally = Tally::new(suite.num_tests());

        self.sink.write(&header)?;
        self.sink.save_cursor()?;
        self.write_progress(&tally)?;

        let mut draw_error = None;
        let sink = &mut self.sink;
        suite.run(|result| {
            tally.record(result);
            if draw_error.is_none() {
                if let Err(e) = write_progress(sink, &tally) {
                    draw_error = Some(e);
                }
            }
        })?;
        if let Some(e) = draw_error {
            return Err(e.into());
        }

        self.write_progress(&tally)?;
        self.write_debug_info(suite, &tally)?;

        let summary = Summary {
            title: suite.title().to_string(),
            total: tally.total,
            completed: tally.completed,
            successes: tally.successes,
            failures: tally.failures,
            skips: suite.num_skips(),
        };
        tracing::debug!(
            successes = summary.successes,
            failures = summary.failures,
            skips = summary.skips,
            "suite finished"
        );
        Ok(summary)
    }

    /// Run several suites in order
    pub fn run_all(&mut self, suites: &mut [&mut Suite]) -> Result<Vec<Summary>> {
        suites.iter_mut().map(|suite| self.run(suite)).collect()
    }

    fn write_progress(&mut self, tally: &Tally) -> std::io::Result<()> {
        write_progress(&mut self.sink, tally)
    }

    fn write_debug_info(&mut self, suite: &Suite, tally: &Tally) -> std::io::Result<()> {
        self.sink.write("\n")?;

        let skips = suite.num_skips();
        if skips > 0 {
            let message = format!("Skipped {} {}.\n", skips, text::pluralize(skips, "test"));
            self.sink.write_colored(&message, Color::White, Style::Plain)?;
        }

        if let Some(failure) = &tally.first_failure {
            self.sink.write("\n")?;
            let header = format!("Test failed: {}", failure.title());
            self.sink.write_colored(&header, Color::Red, Style::Bold)?;
            self.sink.write("\n")?;
            self.sink.write(failure.output())?;
            self.sink.write("\n")?;
            self.sink.write(failure.traceback())?;
            self.sink.write("\n")?;
        }
        Ok(())
    }
}

fn write_progress<S: ProgressSink>(sink: &mut S, tally: &Tally) -> std::io::Result<()> {
    let color = if tally.failures > 0 {
        Color::Red
    } else {
        Color::Green
    };
    let status = format!("({}/{})", tally.completed, tally.total);

    sink.restore_cursor()?;
    sink.clear_to_end_of_line()?;
    sink.write_colored(&status, color, Style::Bold)
}
