use std::fmt;

use serde::Serialize;

/// Platform family that decides how a command is wrapped in a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    /// Every non-Windows family.
    Unix,
}

impl Platform {
    /// Platform of the compile target.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// Tokens placed before the executable when a new shell is requested.
    #[must_use]
    pub const fn shell_prefix(self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["cmd", "/C"],
            Self::Unix => &["sh"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("windows"),
            Self::Unix => f.write_str("unix"),
        }
    }
}
