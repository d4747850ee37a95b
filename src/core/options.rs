//! Package options and their defaults.
//!
//! Options come in two layers: [`OptionOverrides`] is what the user asked
//! for (every field optional, absence means "use the default"), and
//! [`PackageOptions`] is the effective set for one target platform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::RecipeError;
use crate::core::platform::PlatformTag;

/// SQLite threading mode (`SQLITE_THREADSAFE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ThreadSafety {
    /// 0: all mutexes compiled out
    SingleThread,
    /// 1: safe for unrestricted use across threads
    #[default]
    Serialized,
    /// 2: safe as long as connections are not shared between threads
    MultiThread,
}

impl ThreadSafety {
    pub fn level(self) -> u8 {
        match self {
            ThreadSafety::SingleThread => 0,
            ThreadSafety::Serialized => 1,
            ThreadSafety::MultiThread => 2,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != ThreadSafety::SingleThread
    }
}

impl TryFrom<u8> for ThreadSafety {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ThreadSafety::SingleThread),
            1 => Ok(ThreadSafety::Serialized),
            2 => Ok(ThreadSafety::MultiThread),
            other => Err(format!("threadsafe must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl From<ThreadSafety> for u8 {
    fn from(mode: ThreadSafety) -> Self {
        mode.level()
    }
}

/// Value of a single option on the option surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionValue {
    Bool(bool),
    Level(u8),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => write!(f, "True"),
            OptionValue::Bool(false) => write!(f, "False"),
            OptionValue::Level(n) => write!(f, "{}", n),
        }
    }
}

/// Option names, in surface order.
pub const OPTION_NAMES: &[&str] = &[
    "shared",
    "fPIC",
    "threadsafe",
    "enable_column_metadata",
    "enable_explain_comments",
    "enable_fts3",
    "enable_fts4",
    "enable_fts5",
    "enable_json1",
    "enable_rtree",
    "omit_load_extension",
];

/// User-requested option values. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionOverrides {
    pub shared: Option<bool>,
    #[serde(rename = "fPIC")]
    pub fpic: Option<bool>,
    pub threadsafe: Option<ThreadSafety>,
    pub enable_column_metadata: Option<bool>,
    pub enable_explain_comments: Option<bool>,
    pub enable_fts3: Option<bool>,
    pub enable_fts4: Option<bool>,
    pub enable_fts5: Option<bool>,
    pub enable_json1: Option<bool>,
    pub enable_rtree: Option<bool>,
    pub omit_load_extension: Option<bool>,
}

impl OptionOverrides {
    /// Set one option from its textual form (`True`, `false`, `2`, ...).
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), RecipeError> {
        if name == "threadsafe" {
            let level: u8 = value.trim().parse().map_err(|_| RecipeError::InvalidOption {
                name: name.to_string(),
                reason: format!("expected 0, 1 or 2, got `{}`", value),
            })?;
            let mode = ThreadSafety::try_from(level).map_err(|reason| {
                RecipeError::InvalidOption {
                    name: name.to_string(),
                    reason,
                }
            })?;
            self.threadsafe = Some(mode);
            return Ok(());
        }

        let flag = parse_bool(value).ok_or_else(|| RecipeError::InvalidOption {
            name: name.to_string(),
            reason: format!("expected True or False, got `{}`", value),
        })?;

        let slot = match name {
            "shared" => &mut self.shared,
            "fPIC" | "fpic" => &mut self.fpic,
            "enable_column_metadata" => &mut self.enable_column_metadata,
            "enable_explain_comments" => &mut self.enable_explain_comments,
            "enable_fts3" => &mut self.enable_fts3,
            "enable_fts4" => &mut self.enable_fts4,
            "enable_fts5" => &mut self.enable_fts5,
            "enable_json1" => &mut self.enable_json1,
            "enable_rtree" => &mut self.enable_rtree,
            "omit_load_extension" => &mut self.omit_load_extension,
            _ => {
                return Err(RecipeError::InvalidOption {
                    name: name.to_string(),
                    reason: format!("unknown option (known: {})", OPTION_NAMES.join(", ")),
                })
            }
        };
        *slot = Some(flag);
        Ok(())
    }

    /// Parse a `name=value` assignment.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), RecipeError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| RecipeError::InvalidOption {
                name: assignment.to_string(),
                reason: "expected `name=value`".to_string(),
            })?;
        self.set(name.trim(), value)
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(&mut self, other: &OptionOverrides) {
        self.shared = other.shared.or(self.shared);
        self.fpic = other.fpic.or(self.fpic);
        self.threadsafe = other.threadsafe.or(self.threadsafe);
        self.enable_column_metadata = other.enable_column_metadata.or(self.enable_column_metadata);
        self.enable_explain_comments = other
            .enable_explain_comments
            .or(self.enable_explain_comments);
        self.enable_fts3 = other.enable_fts3.or(self.enable_fts3);
        self.enable_fts4 = other.enable_fts4.or(self.enable_fts4);
        self.enable_fts5 = other.enable_fts5.or(self.enable_fts5);
        self.enable_json1 = other.enable_json1.or(self.enable_json1);
        self.enable_rtree = other.enable_rtree.or(self.enable_rtree);
        self.omit_load_extension = other.omit_load_extension.or(self.omit_load_extension);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "True" | "true" | "ON" | "on" | "1" | "yes" => Some(true),
        "False" | "false" | "OFF" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Effective options for one build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageOptions {
    pub shared: bool,
    /// Position-independent code. `None` when the option is not part of the
    /// surface for the target platform (Windows).
    pub fpic: Option<bool>,
    pub threadsafe: ThreadSafety,
    pub enable_column_metadata: bool,
    pub enable_explain_comments: bool,
    pub enable_fts3: bool,
    pub enable_fts4: bool,
    pub enable_fts5: bool,
    pub enable_json1: bool,
    pub enable_rtree: bool,
    pub omit_load_extension: bool,
}

impl PackageOptions {
    /// Defaults for `platform`.
    pub fn defaults(platform: PlatformTag) -> Self {
        PackageOptions {
            shared: false,
            fpic: if platform.is_windows() { None } else { Some(true) },
            threadsafe: ThreadSafety::default(),
            enable_column_metadata: false,
            enable_explain_comments: false,
            enable_fts3: false,
            enable_fts4: false,
            enable_fts5: false,
            enable_json1: false,
            enable_rtree: false,
            omit_load_extension: false,
        }
    }

    /// Apply user overrides on top of the platform defaults.
    ///
    /// Options that do not apply to `platform` are dropped silently.
    pub fn for_platform(platform: PlatformTag, overrides: &OptionOverrides) -> Self {
        let mut opts = Self::defaults(platform);

        if let Some(fpic) = overrides.fpic {
            if platform.is_windows() {
                tracing::debug!("ignoring fPIC={} on {}", fpic, platform);
            } else {
                opts.fpic = Some(fpic);
            }
        }

        opts.shared = overrides.shared.unwrap_or(opts.shared);
        opts.threadsafe = overrides.threadsafe.unwrap_or(opts.threadsafe);
        opts.enable_column_metadata = overrides
            .enable_column_metadata
            .unwrap_or(opts.enable_column_metadata);
        opts.enable_explain_comments = overrides
            .enable_explain_comments
            .unwrap_or(opts.enable_explain_comments);
        opts.enable_fts3 = overrides.enable_fts3.unwrap_or(opts.enable_fts3);
        opts.enable_fts4 = overrides.enable_fts4.unwrap_or(opts.enable_fts4);
        opts.enable_fts5 = overrides.enable_fts5.unwrap_or(opts.enable_fts5);
        opts.enable_json1 = overrides.enable_json1.unwrap_or(opts.enable_json1);
        opts.enable_rtree = overrides.enable_rtree.unwrap_or(opts.enable_rtree);
        opts.omit_load_extension = overrides
            .omit_load_extension
            .unwrap_or(opts.omit_load_extension);

        opts
    }

    /// Whether the built library may load extensions at runtime.
    pub fn allows_load_extension(&self) -> bool {
        !self.omit_load_extension
    }

    /// The option surface: every option present for this platform, in order.
    pub fn surface(&self) -> Vec<(&'static str, OptionValue)> {
        let mut surface = vec![("shared", OptionValue::Bool(self.shared))];
        if let Some(fpic) = self.fpic {
            surface.push(("fPIC", OptionValue::Bool(fpic)));
        }
        surface.extend([
            ("threadsafe", OptionValue::Level(self.threadsafe.level())),
            (
                "enable_column_metadata",
                OptionValue::Bool(self.enable_column_metadata),
            ),
            (
                "enable_explain_comments",
                OptionValue::Bool(self.enable_explain_comments),
            ),
            ("enable_fts3", OptionValue::Bool(self.enable_fts3)),
            ("enable_fts4", OptionValue::Bool(self.enable_fts4)),
            ("enable_fts5", OptionValue::Bool(self.enable_fts5)),
            ("enable_json1", OptionValue::Bool(self.enable_json1)),
            ("enable_rtree", OptionValue::Bool(self.enable_rtree)),
            (
                "omit_load_extension",
                OptionValue::Bool(self.omit_load_extension),
            ),
        ]);
        surface
    }
}
