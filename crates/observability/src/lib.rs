//! Tracing and logging setup shared by the binaries.

/// Initialize process-wide tracing with an `info` default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Like [`init`], but with a caller-chosen default filter directive
/// (used when `RUST_LOG` is unset or invalid).
pub fn init_with_default(directive: &str) {
    tracing::init(directive);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
