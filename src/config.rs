//! Configuration shared by suites and runners

/// Color mode for progress output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Never use colors
    Never,
    /// Use colors when stdout is a terminal
    Auto,
}

impl ColorMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            "auto" => Some(ColorMode::Auto),
            _ => None,
        }
    }
}

/// Settings for running suites
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Whether a suite stops at its first failing test
    pub stop_on_error: bool,
    /// How the terminal sink decides whether to color output
    pub color: ColorMode,
    /// Whether tests capture stdout and stderr, not just the output channel
    pub capture_stdio: bool,
}

impl Config {
    /// Create a Config with default settings, honoring the environment
    ///
    /// * `TESTSUITE_STOP_ON_ERROR` - `1`/`true` or `0`/`false`
    /// * `TESTSUITE_COLOR` - `always`, `never` or `auto`
    /// * `NO_COLOR` - disables colors when set
    /// * `TESTSUITE_CAPTURE_STDIO` - `1`/`true` or `0`/`false`
    pub fn from_env() -> Self {
        let stop_on_error = std::env::var("TESTSUITE_STOP_ON_ERROR")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        let capture_stdio = std::env::var("TESTSUITE_CAPTURE_STDIO")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);

        let color = if std::env::var("NO_COLOR").is_ok() {
            ColorMode::Never
        } else {
            std::env::var("TESTSUITE_COLOR")
                .ok()
                .and_then(|v| ColorMode::parse(&v))
                .unwrap_or(ColorMode::Auto)
        };

        Config {
            stop_on_error,
            color,
            capture_stdio,
        }
    }

    /// Set whether suites stop at the first failure
    pub fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }

    /// Set the color mode
    pub fn color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Set whether tests capture stdout and stderr
    pub fn capture_stdio(mut self, capture: bool) -> Self {
        self.capture_stdio = capture;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}
