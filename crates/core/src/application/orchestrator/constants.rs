// Orchestrator constants (no magic values)

/// Detail summary width used in log lines
pub const LOG_DETAIL_MAX_CHARS: usize = 160;

/// Fallback message when a panic payload is neither &str nor String
pub const UNKNOWN_PANIC_MESSAGE: &str = "Unknown panic";
