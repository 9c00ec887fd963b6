//! Tracing and logging setup shared by the binaries.

/// Initialize process-wide tracing with the default (JSON) output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(LogFormat::default());
}

/// Tracing configuration (filters, formatting).
pub mod tracing;

pub use self::tracing::{LogFormat, ParseLogFormatError, init_with};
