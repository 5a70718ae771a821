//! Call-site resolution
//!
//! The public entry points of [`Logger`](super::Logger) are `#[track_caller]`,
//! so [`Caller::resolve`] observes the application's call site no matter how
//! many of those entry points sit between it and the application code. A
//! helper wrapper only stays transparent if it is `#[track_caller]` too.

use std::fmt;
use std::panic::Location;

/// Short source location of a log call: `file.rs:42`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    file: &'static str,
    line: u32,
}

impl Caller {
    /// Resolve the caller of the outermost `#[track_caller]` frame
    ///
    /// Returns `None` when no file name is available; the record then simply
    /// carries no caller.
    #[track_caller]
    #[must_use]
    pub fn resolve() -> Option<Self> {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &Location<'static>) -> Option<Self> {
        let file = short_file_name(location.file());
        if file.is_empty() {
            return None;
        }
        Some(Self {
            file,
            line: location.line(),
        })
    }

    /// Last path segment of the source file
    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn short_file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_file_name() {
        assert_eq!(short_file_name("src/core/caller.rs"), "caller.rs");
        assert_eq!(short_file_name(r"C:\work\app\main.rs"), "main.rs");
        assert_eq!(short_file_name("main.rs"), "main.rs");
        assert_eq!(short_file_name("src/"), "");
    }

    #[test]
    fn test_resolve_reports_this_file() {
        let expected_line = line!() + 1;
        let caller = Caller::resolve().expect("location available");
        assert_eq!(caller.file(), "caller.rs");
        assert_eq!(caller.line(), expected_line);
        assert_eq!(caller.to_string(), format!("caller.rs:{}", expected_line));
    }

    #[test]
    fn test_resolve_through_track_caller_wrapper() {
        #[track_caller]
        fn wrapper() -> Option<Caller> {
            Caller::resolve()
        }

        let expected_line = line!() + 1;
        let caller = wrapper().expect("location available");
        assert_eq!(caller.line(), expected_line);
    }
}
