//! Target operating system tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Target operating system, as reported by the host settings.
///
/// Parsing is lenient about casing and accepts both settings-style names
/// (`Windows`, `Macos`, `iOS`) and Rust target names (`windows`, `macos`).
/// Anything unrecognized maps to [`PlatformTag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlatformTag {
    Windows,
    Linux,
    Macos,
    Ios,
    Tvos,
    Watchos,
    Android,
    FreeBsd,
    Other,
}

impl PlatformTag {
    /// The platform this process is running on.
    pub fn host() -> Self {
        std::env::consts::OS
            .parse()
            .unwrap_or(PlatformTag::Other)
    }

    pub fn is_windows(self) -> bool {
        self == PlatformTag::Windows
    }

    /// Linux family (desktop/server Linux; Android is tracked separately).
    pub fn is_linux(self) -> bool {
        self == PlatformTag::Linux
    }

    pub fn is_apple(self) -> bool {
        matches!(
            self,
            PlatformTag::Macos | PlatformTag::Ios | PlatformTag::Tvos | PlatformTag::Watchos
        )
    }

    pub fn is_android(self) -> bool {
        self == PlatformTag::Android
    }

    /// Settings-style display name.
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformTag::Windows => "Windows",
            PlatformTag::Linux => "Linux",
            PlatformTag::Macos => "Macos",
            PlatformTag::Ios => "iOS",
            PlatformTag::Tvos => "tvOS",
            PlatformTag::Watchos => "watchOS",
            PlatformTag::Android => "Android",
            PlatformTag::FreeBsd => "FreeBSD",
            PlatformTag::Other => "Other",
        }
    }
}

impl FromStr for PlatformTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "windowsstore" => PlatformTag::Windows,
            "linux" => PlatformTag::Linux,
            "macos" | "darwin" | "macosx" => PlatformTag::Macos,
            "ios" => PlatformTag::Ios,
            "tvos" => PlatformTag::Tvos,
            "watchos" => PlatformTag::Watchos,
            "android" => PlatformTag::Android,
            "freebsd" => PlatformTag::FreeBsd,
            _ => PlatformTag::Other,
        };
        Ok(tag)
    }
}

impl TryFrom<String> for PlatformTag {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlatformTag> for String {
    fn from(tag: PlatformTag) -> Self {
        tag.as_str().to_string()
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
