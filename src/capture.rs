//! Scoped output capture
//!
//! Everything this crate prints, and everything tests print with [`say!`],
//! goes through a per-thread output channel. By default the channel writes to
//! stdout. An [`OutputCapture`] swaps in a buffer for as long as it is alive;
//! captures nest, and releasing one (with [`OutputCapture::finish`] or by
//! dropping it, including during unwinding) hands the channel back to
//! whatever was active before.
//!
//! [`OutputCapture::begin`] also redirects the process's stdout and stderr
//! file descriptors with `gag`, so `println!` and `eprintln!` end up in the
//! same buffer. Only one redirect can exist per process: the first capture
//! to get it shares it with the captures nested inside it, and a capture that
//! can't get it falls back to the channel alone. Bytes any thread writes to
//! the redirected descriptors are collected, and under libtest `println!` is
//! already captured by the harness before it reaches the descriptor.

use gag::BufferRedirect;
use std::cell::RefCell;
use std::io::{self, Read, Write};

thread_local! {
    static BUFFERS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static REDIRECT: RefCell<Option<StdioRedirect>> = const { RefCell::new(None) };
}

/// The stdout and stderr redirects, owned by the capture at `depth`
struct StdioRedirect {
    depth: usize,
    stdout: BufferRedirect,
    stderr: BufferRedirect,
}

impl StdioRedirect {
    fn acquire(depth: usize) -> Option<Self> {
        let redirect = BufferRedirect::stdout().and_then(|stdout| {
            let stderr = BufferRedirect::stderr()?;
            Ok(StdioRedirect {
                depth,
                stdout,
                stderr,
            })
        });
        match redirect {
            Ok(redirect) => Some(redirect),
            Err(e) => {
                tracing::debug!(error = %e, "stdio redirect unavailable, capturing the channel only");
                None
            }
        }
    }

    /// Everything written to the descriptors since the last drain
    fn drain(&mut self) -> String {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();

        let mut bytes = Vec::new();
        let _ = self.stdout.read_to_end(&mut bytes);
        let _ = self.stderr.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Move redirected bytes into the innermost buffer
fn drain_into(buffers: &mut [String]) {
    REDIRECT.with(|redirect| {
        if let Some(redirect) = redirect.borrow_mut().as_mut() {
            let text = redirect.drain();
            if let Some(buffer) = buffers.last_mut() {
                buffer.push_str(&text);
            }
        }
    });
}

/// Write text to the current output channel
pub fn emit(text: &str) -> io::Result<()> {
    let captured = BUFFERS.with(|buffers| {
        let mut buffers = buffers.borrow_mut();
        drain_into(&mut buffers);
        match buffers.last_mut() {
            Some(buffer) => {
                buffer.push_str(text);
                true
            }
            None => false,
        }
    });

    if !captured {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

/// Whether a capture is active on this thread
pub fn is_capturing() -> bool {
    BUFFERS.with(|buffers| !buffers.borrow().is_empty())
}

/// Whether this thread currently holds the stdio redirect
pub fn is_redirecting() -> bool {
    REDIRECT.with(|redirect| redirect.borrow().is_some())
}

/// Run `f` with its output captured, returning its value and the output
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = OutputCapture::begin();
    let value = f();
    (value, capture.finish())
}

/// Write a line to the current output channel
///
/// Works like `println!`, except that the text is muffled while a test runs
/// and only shown if that test fails. Unlike `println!`, it is captured even
/// when the stdio redirect is unavailable.
#[macro_export]
macro_rules! say {
    () => {{
        let _ = $crate::capture::emit("\n");
    }};
    ($($arg:tt)*) => {{
        let _ = $crate::capture::emit(&format!("{}\n", format_args!($($arg)*)));
    }};
}

/// A live capture of the output channel
#[derive(Debug)]
pub struct OutputCapture {
    depth: usize,
    released: bool,
}

impl OutputCapture {
    /// Start buffering the output channel together with stdout and stderr
    pub fn begin() -> Self {
        Self::start(true)
    }

    /// Start buffering the output channel only
    pub fn channel_only() -> Self {
        Self::start(false)
    }

    fn start(stdio: bool) -> Self {
        let depth = BUFFERS.with(|buffers| {
            let mut buffers = buffers.borrow_mut();
            drain_into(&mut buffers);
            buffers.push(String::new());
            buffers.len()
        });

        if stdio && !is_redirecting() {
            let redirect = StdioRedirect::acquire(depth);
            REDIRECT.with(|slot| *slot.borrow_mut() = redirect);
        }

        OutputCapture {
            depth,
            released: false,
        }
    }

    /// Text captured so far
    pub fn contents(&self) -> String {
        BUFFERS.with(|buffers| {
            let mut buffers = buffers.borrow_mut();
            if buffers.len() == self.depth {
                drain_into(&mut buffers);
            }
            buffers
                .get(self.depth - 1)
                .cloned()
                .unwrap_or_default()
        })
    }

    /// Stop capturing and return everything that was written
    pub fn finish(mut self) -> String {
        self.release()
    }

    fn release(&mut self) -> String {
        self.released = true;
        let text = BUFFERS.with(|buffers| {
            let mut buffers = buffers.borrow_mut();
            drain_into(&mut buffers);
            if buffers.len() > self.depth {
                tracing::warn!(
                    depth = self.depth,
                    open = buffers.len(),
                    "output capture released while inner captures were still open"
                );
                buffers.truncate(self.depth);
            }
            if buffers.len() == self.depth {
                buffers.pop().unwrap_or_default()
            } else {
                String::new()
            }
        });

        REDIRECT.with(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.as_ref().is_some_and(|redirect| redirect.depth >= self.depth) {
                // Dropping the redirects restores the descriptors.
                *slot = None;
            }
        });
        text
    }
}

impl Drop for OutputCapture {
    fn drop(&mut self) {
        if !self.released {
            self.release();
        }
    }
}
