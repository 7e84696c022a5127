//! Diagnostic trace lines emitted while talking to the admin API.

use crate::LIB_LOG_TARGET;
use std::fmt::Debug;
use tracing::debug;

const LOG_PREFIX: &str = "Centrifuge: ";

/// Receiver for human readable trace lines about requests and responses.
///
/// A logger only observes; it can never change the outcome of a call.
pub trait Logger: Send + Sync + Debug {
    /// Record a single trace line.
    fn log(&self, message: &str);
}

/// Forwards trace lines to [`tracing`] at debug level under [`LIB_LOG_TARGET`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        debug!(target: LIB_LOG_TARGET, "{}{}", LOG_PREFIX, message);
    }
}

/// Discards every trace line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _message: &str) {}
}

/// Adapts a closure into a [`Logger`].
pub struct FnLogger<F> {
    func: F,
}

impl<F> FnLogger<F>
where
    F: Fn(&str) + Send + Sync,
{
    /// Create a new `FnLogger` calling `func` with each prefixed line.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Logger for FnLogger<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        (self.func)(format!("{}{}", LOG_PREFIX, message).as_str())
    }
}

impl<F> Debug for FnLogger<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnLogger")
    }
}
