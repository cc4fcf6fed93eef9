//! Legacy logging helpers.
//!
//! Each helper writes one line to stdout: the severity tag, the message and
//! every extra argument, separated by single spaces. Nothing is filtered or
//! buffered.
//!
//! # Example
//!
//! ```
//! use rclbind_compat::{Severity, format_log, loginfo};
//!
//! assert_eq!(format_log(Severity::Info, "hello", &[&1, &"two"]), "[INFO] hello 1 two");
//! loginfo!("position", 1.5, -2);
//! ```

use std::fmt::{self, Display, Write};

/// Severity of a legacy log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warning.
    Warn,
    /// Error.
    Error,
    /// Fatal.
    Fatal,
}

impl Severity {
    /// Tag printed between brackets.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format `"[LEVEL] msg arg1 arg2 ..."`.
pub fn format_log(severity: Severity, msg: &str, args: &[&dyn Display]) -> String {
    let mut line = format!("[{severity}] {msg}");
    for arg in args {
        let _ = write!(line, " {arg}");
    }
    line
}

/// Print a formatted line to stdout.
pub fn log(severity: Severity, msg: &str, args: &[&dyn Display]) {
    println!("{}", format_log(severity, msg, args));
}

/// Print a debug line.
pub fn logdebug(msg: &str, args: &[&dyn Display]) {
    log(Severity::Debug, msg, args);
}

/// Print an info line.
pub fn loginfo(msg: &str, args: &[&dyn Display]) {
    log(Severity::Info, msg, args);
}

/// Print a warning line.
pub fn logwarn(msg: &str, args: &[&dyn Display]) {
    log(Severity::Warn, msg, args);
}

/// Print an error line.
pub fn logerr(msg: &str, args: &[&dyn Display]) {
    log(Severity::Error, msg, args);
}

/// Print a fatal line.
pub fn logfatal(msg: &str, args: &[&dyn Display]) {
    log(Severity::Fatal, msg, args);
}

/// Print a debug line: `logdebug!(msg, args...)`.
#[macro_export]
macro_rules! logdebug {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::logging::logdebug($msg, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Print an info line: `loginfo!(msg, args...)`.
#[macro_export]
macro_rules! loginfo {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::logging::loginfo($msg, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Print a warning line: `logwarn!(msg, args...)`.
#[macro_export]
macro_rules! logwarn {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::logging::logwarn($msg, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Print an error line: `logerr!(msg, args...)`.
#[macro_export]
macro_rules! logerr {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::logging::logerr($msg, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Print a fatal line: `logfatal!(msg, args...)`.
#[macro_export]
macro_rules! logfatal {
    ($msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::logging::logfatal($msg, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_without_args() {
        assert_eq!(format_log(Severity::Debug, "start", &[]), "[DEBUG] start");
    }

    #[test]
    fn test_format_each_severity() {
        for (severity, tag) in [
            (Severity::Debug, "DEBUG"),
            (Severity::Info, "INFO"),
            (Severity::Warn, "WARN"),
            (Severity::Error, "ERROR"),
            (Severity::Fatal, "FATAL"),
        ] {
            assert_eq!(
                format_log(severity, "msg", &[&42, &"x", &2.5]),
                format!("[{tag}] msg 42 x 2.5")
            );
        }
    }

    #[test]
    fn test_macros() {
        logdebug!("debug");
        loginfo!("info", 1);
        logwarn!("warn", 1, "two");
        logerr!("error", 'e',);
        logfatal!("fatal", 0.5);
    }
}
