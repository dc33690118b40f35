//! Turning panics into reports
//!
//! A process-wide panic hook is installed the first time [`catch`] is used.
//! While a `catch` is in progress on a thread, panics on that thread are
//! recorded for the caller instead of being printed; every other panic goes to
//! the hook that was installed before.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static CATCHING: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<PanicReport>> = const { RefCell::new(None) };
}

/// What a caught panic said and where it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicReport {
    pub message: String,
    pub location: Option<String>,
}

impl std::fmt::Display for PanicReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "panicked at {}:\n{}", location, self.message),
            None => write!(f, "panicked: {}", self.message),
        }
    }
}

struct CatchGuard;

impl CatchGuard {
    fn enter() -> Self {
        CATCHING.with(|depth| depth.set(depth.get() + 1));
        CatchGuard
    }
}

impl Drop for CatchGuard {
    fn drop(&mut self) {
        CATCHING.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let catching = CATCHING.try_with(|depth| depth.get() > 0).unwrap_or(false);
            if !catching {
                previous(info);
                return;
            }
            let report = PanicReport {
                message: payload_message(info.payload()),
                location: info
                    .location()
                    .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
            };
            let _ = LAST_PANIC.try_with(|slot| *slot.borrow_mut() = Some(report));
        }));
    });
}

/// Run `f`, converting a panic into a [`PanicReport`]
pub fn catch<T>(f: impl FnOnce() -> T) -> Result<T, PanicReport> {
    install_hook();
    let result = {
        let _guard = CatchGuard::enter();
        panic::catch_unwind(AssertUnwindSafe(f))
    };

    result.map_err(|payload| {
        LAST_PANIC
            .with(|slot| slot.borrow_mut().take())
            .unwrap_or_else(|| PanicReport {
                message: payload_message(payload.as_ref()),
                location: None,
            })
    })
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
