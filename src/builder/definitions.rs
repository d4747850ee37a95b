//! Option-to-definition mapping.
//!
//! Definitions are assembled in three passes, each one able to overwrite the
//! previous:
//!
//! 1. one definition per option on the surface, value passed through verbatim
//! 2. baseline capability flags, all enabled
//! 3. platform override rules, in declaration order
//!
//! Pass 3 always runs last, so a platform that lacks a capability never gets
//! it back from an option or a default.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::core::options::{OptionValue, PackageOptions};
use crate::core::platform::PlatformTag;

/// Definition key for the install prefix, added by the orchestrator.
pub const INSTALL_PREFIX_KEY: &str = "CMAKE_INSTALL_PREFIX";

pub const HAVE_FDATASYNC: &str = "HAVE_FDATASYNC";
pub const HAVE_GMTIME_R: &str = "HAVE_GMTIME_R";
pub const HAVE_LOCALTIME_R: &str = "HAVE_LOCALTIME_R";
pub const HAVE_POSIX_FALLOCATE: &str = "HAVE_POSIX_FALLOCATE";
pub const HAVE_STRERROR_R: &str = "HAVE_STRERROR_R";
pub const HAVE_USLEEP: &str = "HAVE_USLEEP";

/// Capabilities assumed present unless a platform rule says otherwise.
pub const BASELINE_CAPABILITIES: &[&str] = &[
    HAVE_FDATASYNC,
    HAVE_GMTIME_R,
    HAVE_LOCALTIME_R,
    HAVE_POSIX_FALLOCATE,
    HAVE_STRERROR_R,
    HAVE_USLEEP,
];

/// A single definition value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DefinitionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl DefinitionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DefinitionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render in CMake `-D` syntax.
    pub fn to_cmake(&self) -> String {
        match self {
            DefinitionValue::Bool(true) => "ON".to_string(),
            DefinitionValue::Bool(false) => "OFF".to_string(),
            DefinitionValue::Int(i) => i.to_string(),
            DefinitionValue::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for DefinitionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cmake())
    }
}

impl From<bool> for DefinitionValue {
    fn from(b: bool) -> Self {
        DefinitionValue::Bool(b)
    }
}

impl From<i64> for DefinitionValue {
    fn from(i: i64) -> Self {
        DefinitionValue::Int(i)
    }
}

impl From<String> for DefinitionValue {
    fn from(s: String) -> Self {
        DefinitionValue::Str(s)
    }
}

/// The definition set handed to the build tool. Keys iterate sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildDefinitions {
    entries: BTreeMap<String, DefinitionValue>,
}

impl BuildDefinitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DefinitionValue> {
        self.entries.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(DefinitionValue::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefinitionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of this set with one more entry.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DefinitionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// `-DKEY=VALUE` arguments, in key order.
    pub fn to_cmake_args(&self) -> Vec<String> {
        self.iter()
            .map(|(key, value)| format!("-D{}={}", key, value.to_cmake()))
            .collect()
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<DefinitionValue>) {
        self.entries.insert(key.into(), value.into());
    }
}

/// A platform-conditional set of forced values.
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub name: &'static str,
    pub applies: fn(PlatformTag) -> bool,
    pub forced: &'static [(&'static str, bool)],
}

/// Platform overrides, applied in order after everything else.
pub const PLATFORM_OVERRIDES: &[OverrideRule] = &[
    OverrideRule {
        name: "windows",
        applies: PlatformTag::is_windows,
        forced: &[(HAVE_LOCALTIME_R, false), (HAVE_POSIX_FALLOCATE, false)],
    },
    OverrideRule {
        name: "apple",
        applies: PlatformTag::is_apple,
        forced: &[(HAVE_POSIX_FALLOCATE, false)],
    },
    OverrideRule {
        name: "android",
        applies: PlatformTag::is_android,
        forced: &[(HAVE_POSIX_FALLOCATE, false)],
    },
];

/// CMake key for each option on the surface.
fn definition_key(option: &str) -> String {
    match option {
        "shared" => "BUILD_SHARED_LIBS".to_string(),
        "fPIC" => "CMAKE_POSITION_INDEPENDENT_CODE".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

/// Map options for `platform` onto build definitions.
///
/// Pure: the same inputs always give the same definitions.
pub fn map_options(options: &PackageOptions, platform: PlatformTag) -> BuildDefinitions {
    map_options_with(options, platform, PLATFORM_OVERRIDES)
}

/// [`map_options`] with an explicit rule list.
pub fn map_options_with(
    options: &PackageOptions,
    platform: PlatformTag,
    rules: &[OverrideRule],
) -> BuildDefinitions {
    let mut defs = BuildDefinitions::new();

    for (name, value) in options.surface() {
        if name == "fPIC" && platform.is_windows() {
            continue;
        }
        let value = match value {
            OptionValue::Bool(b) => DefinitionValue::Bool(b),
            OptionValue::Level(n) => DefinitionValue::Int(n.into()),
        };
        defs.insert(definition_key(name), value);
    }

    for capability in BASELINE_CAPABILITIES {
        defs.insert(*capability, true);
    }

    for rule in rules.iter().filter(|rule| (rule.applies)(platform)) {
        tracing::debug!("applying {} overrides for {}", rule.name, platform);
        for (key, value) in rule.forced {
            defs.insert(*key, *value);
        }
    }

    defs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::{OptionOverrides, ThreadSafety};

    fn everything_on() -> OptionOverrides {
        let mut overrides = OptionOverrides::default();
        for name in crate::core::options::OPTION_NAMES {
            if *name == "threadsafe" {
                overrides.set(name, "2").unwrap();
            } else {
                overrides.set(name, "True").unwrap();
            }
        }
        overrides
    }

    #[test]
    fn test_linux_defaults() {
        let opts = PackageOptions::defaults(PlatformTag::Linux);
        let defs = map_options(&opts, PlatformTag::Linux);

        assert_eq!(defs.get("THREADSAFE"), Some(&DefinitionValue::Int(1)));
        assert_eq!(defs.get_bool("BUILD_SHARED_LIBS"), Some(false));
        assert_eq!(defs.get_bool("CMAKE_POSITION_INDEPENDENT_CODE"), Some(true));
        assert_eq!(defs.get_bool("ENABLE_FTS5"), Some(false));
        assert_eq!(defs.get_bool("OMIT_LOAD_EXTENSION"), Some(false));
        for capability in BASELINE_CAPABILITIES {
            assert_eq!(defs.get_bool(capability), Some(true), "{}", capability);
        }
        assert_eq!(defs.len(), 11 + BASELINE_CAPABILITIES.len());
    }

    #[test]
    fn test_options_pass_through_verbatim() {
        let opts = PackageOptions::for_platform(PlatformTag::Linux, &everything_on());
        let defs = map_options(&opts, PlatformTag::Linux);

        assert_eq!(opts.threadsafe, ThreadSafety::MultiThread);
        assert_eq!(defs.get("THREADSAFE"), Some(&DefinitionValue::Int(2)));
        for key in [
            "ENABLE_COLUMN_METADATA",
            "ENABLE_EXPLAIN_COMMENTS",
            "ENABLE_FTS3",
            "ENABLE_FTS4",
            "ENABLE_FTS5",
            "ENABLE_JSON1",
            "ENABLE_RTREE",
            "OMIT_LOAD_EXTENSION",
            "BUILD_SHARED_LIBS",
        ] {
            assert_eq!(defs.get_bool(key), Some(true), "{}", key);
        }
    }

    #[test]
    fn test_windows_overrides_win() {
        let opts = PackageOptions::for_platform(PlatformTag::Windows, &everything_on());
        let defs = map_options(&opts, PlatformTag::Windows);

        assert!(!defs.contains("CMAKE_POSITION_INDEPENDENT_CODE"));
        assert_eq!(defs.get_bool(HAVE_LOCALTIME_R), Some(false));
        assert_eq!(defs.get_bool(HAVE_POSIX_FALLOCATE), Some(false));
        assert_eq!(defs.get_bool(HAVE_GMTIME_R), Some(true));
        assert_eq!(defs.get_bool(HAVE_USLEEP), Some(true));
    }

    #[test]
    fn test_fpic_dropped_even_if_present_in_options() {
        let mut opts = PackageOptions::defaults(PlatformTag::Linux);
        opts.fpic = Some(true);
        let defs = map_options(&opts, PlatformTag::Windows);
        assert!(!defs.contains("CMAKE_POSITION_INDEPENDENT_CODE"));
    }

    #[test]
    fn test_apple_and_android_lose_fallocate_only() {
        for platform in [
            PlatformTag::Macos,
            PlatformTag::Ios,
            PlatformTag::Tvos,
            PlatformTag::Watchos,
            PlatformTag::Android,
        ] {
            let opts = PackageOptions::for_platform(platform, &everything_on());
            let defs = map_options(&opts, platform);

            assert_eq!(defs.get_bool(HAVE_POSIX_FALLOCATE), Some(false), "{}", platform);
            for capability in BASELINE_CAPABILITIES
                .iter()
                .filter(|c| **c != HAVE_POSIX_FALLOCATE)
            {
                assert_eq!(defs.get_bool(capability), Some(true), "{} {}", platform, capability);
            }
            assert_eq!(defs.get_bool("CMAKE_POSITION_INDEPENDENT_CODE"), Some(true));
        }
    }

    #[test]
    fn test_other_platforms_keep_baseline() {
        for platform in [PlatformTag::Linux, PlatformTag::FreeBsd, PlatformTag::Other] {
            let defs = map_options(&PackageOptions::defaults(platform), platform);
            for capability in BASELINE_CAPABILITIES {
                assert_eq!(defs.get_bool(capability), Some(true));
            }
        }
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let opts = PackageOptions::for_platform(PlatformTag::Android, &everything_on());
        let first = map_options(&opts, PlatformTag::Android);
        let second = map_options(&opts, PlatformTag::Android);
        assert_eq!(first, second);
        assert_eq!(first.to_cmake_args(), second.to_cmake_args());
    }

    #[test]
    fn test_rules_apply_in_order() {
        const RULES: &[OverrideRule] = &[
            OverrideRule {
                name: "first",
                applies: PlatformTag::is_linux,
                forced: &[(HAVE_USLEEP, false)],
            },
            OverrideRule {
                name: "second",
                applies: PlatformTag::is_linux,
                forced: &[(HAVE_USLEEP, true), (HAVE_FDATASYNC, false)],
            },
        ];
        let defs = map_options_with(
            &PackageOptions::defaults(PlatformTag::Linux),
            PlatformTag::Linux,
            RULES,
        );
        assert_eq!(defs.get_bool(HAVE_USLEEP), Some(true));
        assert_eq!(defs.get_bool(HAVE_FDATASYNC), Some(false));
    }

    #[test]
    fn test_cmake_args() {
        let defs = BuildDefinitions::new()
            .with("THREADSAFE", 1i64)
            .with("HAVE_USLEEP", false)
            .with(INSTALL_PREFIX_KEY, "/tmp/pkg".to_string());
        assert_eq!(
            defs.to_cmake_args(),
            vec![
                "-DCMAKE_INSTALL_PREFIX=/tmp/pkg",
                "-DHAVE_USLEEP=OFF",
                "-DTHREADSAFE=1",
            ]
        );
    }
}
