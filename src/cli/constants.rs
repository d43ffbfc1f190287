//! Tool identity constants and display-level infrastructure.
//!
//! Verbosity is a crate-level atomic so the I/O drivers and the CLI share
//! one setting: 0 = silent, 1 = errors only, 2 = normal, 3 = verbose.
//! Diagnostics go to stderr (printed by `main`); progress and summaries go
//! to stdout through the macros below.

use std::sync::atomic::{AtomicU32, Ordering};

pub const TOOL_NAME: &str = "lz4opt";
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current display level (see module docs for the scale).
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Print to stdout unconditionally.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stdout when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            print!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_roundtrips() {
        let prev = display_level();
        set_display_level(3);
        assert_eq!(display_level(), 3);
        set_display_level(prev);
    }
}
