//! Host settings bundle: target OS, compiler, architecture and build type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::options::PackageOptions;
use crate::core::platform::PlatformTag;
use crate::util::hash::Fingerprint;

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(format!(
                "unknown build type `{}` (expected Debug, Release, RelWithDebInfo or MinSizeRel)",
                s
            )),
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings reported by the host for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub os: PlatformTag,
    pub compiler: Option<String>,
    pub arch: String,
    pub build_type: BuildType,
    /// C++ standard library flavour. SQLite is pure C, so this never
    /// takes part in the package id.
    pub libcxx: Option<String>,
}

impl Settings {
    /// Settings describing the machine this process runs on.
    pub fn host() -> Self {
        Settings {
            os: PlatformTag::host(),
            compiler: None,
            arch: std::env::consts::ARCH.to_string(),
            build_type: BuildType::default(),
            libcxx: None,
        }
    }

    pub fn with_os(mut self, os: PlatformTag) -> Self {
        self.os = os;
        self
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Stable identifier for the binary produced from these settings and
    /// `options`. Two invocations with the same id produce the same artifact.
    pub fn package_id(&self, options: &PackageOptions) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(self.os.as_str())
            .update_opt(self.compiler.as_deref())
            .update_str(&self.arch)
            .update_str(self.build_type.as_str());

        for (name, value) in options.surface() {
            fp.update_str(name).update_str(&value.to_string());
        }

        fp.finish_short()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::OptionOverrides;

    fn linux() -> Settings {
        Settings {
            os: PlatformTag::Linux,
            compiler: Some("gcc".to_string()),
            arch: "x86_64".to_string(),
            build_type: BuildType::Release,
            libcxx: None,
        }
    }

    #[test]
    fn test_package_id_ignores_libcxx() {
        let opts = PackageOptions::defaults(PlatformTag::Linux);
        let plain = linux();
        let mut with_libcxx = linux();
        with_libcxx.libcxx = Some("libstdc++11".to_string());

        assert_eq!(plain.package_id(&opts), with_libcxx.package_id(&opts));
        assert_eq!(plain.package_id(&opts).len(), 16);
    }

    #[test]
    fn test_package_id_tracks_options_and_settings() {
        let defaults = PackageOptions::defaults(PlatformTag::Linux);
        let mut overrides = OptionOverrides::default();
        overrides.set("enable_json1", "True").unwrap();
        let json = PackageOptions::for_platform(PlatformTag::Linux, &overrides);

        let settings = linux();
        assert_ne!(settings.package_id(&defaults), settings.package_id(&json));

        let debug = linux().with_build_type(BuildType::Debug);
        assert_ne!(settings.package_id(&defaults), debug.package_id(&defaults));
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("release".parse::<BuildType>().unwrap(), BuildType::Release);
        assert_eq!("RelWithDebInfo".parse::<BuildType>().unwrap(), BuildType::RelWithDebInfo);
        assert!("Fast".parse::<BuildType>().is_err());
    }
}
