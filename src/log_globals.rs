//! Global log stream instance.
//!
//! The console loop pushes, the log drain pops. Sessions default to this
//! stream; tests hand each session its own.

use crate::logging::LogStream;

/// Console diagnostics stream.
pub static CONSOLE_LOG: LogStream = LogStream::new();
