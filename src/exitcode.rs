//! Standard exit codes (BSD sysexits.h compatible, plus shell conventions)

/// Successful termination
pub const OK: i32 = 0;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// System error (e.g., can't fork)
pub const OSERR: i32 = 71;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;

/// Runtime found but not executable
pub const NOEXEC: i32 = 126;

/// Runtime not found
pub const NOTFOUND: i32 = 127;

/// Base for "terminated by signal N" (128 + N)
pub const SIGNAL_BASE: i32 = 128;

/// Exit code reporting termination by `signal`.
pub fn signaled(signal: i32) -> i32 {
    SIGNAL_BASE + signal
}
