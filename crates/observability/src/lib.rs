//! Process-wide logging setup shared by the API binary and any future
//! workers.

pub mod tracing;

/// Install the tracing subscriber. Calling it twice is a no-op, so tests and
/// the binary can both call it unconditionally.
pub fn init() {
    tracing::init();
}
