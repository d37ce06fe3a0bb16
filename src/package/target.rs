// LDK Bridge: loader and method dispatcher for the native LDK node library.
// Written in 2023 by
//     LDK Bridge developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::NATIVE_LIB_NAME;

/// Android ABIs the native library is shipped for
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum AndroidAbi {
    #[display("arm64-v8a")]
    Arm64V8a,

    #[display("armeabi-v7a")]
    ArmeabiV7a,

    #[display("x86")]
    X86,
}

impl AndroidAbi {
    pub const ALL: [AndroidAbi; 3] = [AndroidAbi::Arm64V8a, AndroidAbi::ArmeabiV7a, AndroidAbi::X86];

    /// Rust target triple producing binaries for the ABI
    pub fn rust_target(self) -> &'static str {
        match self {
            AndroidAbi::Arm64V8a => "aarch64-linux-android",
            AndroidAbi::ArmeabiV7a => "armv7-linux-androideabi",
            AndroidAbi::X86 => "i686-linux-android",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display("unknown packaging target `{0}`; use `ios`, `arm64-v8a`, `armeabi-v7a` or `x86`")]
pub struct UnknownTarget(String);

impl FromStr for AndroidAbi {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AndroidAbi::ALL
            .into_iter()
            .find(|abi| abi.to_string() == s)
            .ok_or_else(|| UnknownTarget(s.to_owned()))
    }
}

/// Platform artifact produced by packaging
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Display)]
pub enum Target {
    #[display("android-{0}")]
    Android(AndroidAbi),

    /// Universal static archive for iOS devices and simulators
    #[display("ios")]
    Ios,
}

impl Target {
    pub fn all() -> Vec<Target> {
        AndroidAbi::ALL.into_iter().map(Target::Android).chain(Some(Target::Ios)).collect()
    }
}

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "ios" {
            return Ok(Target::Ios);
        }
        let abi = s.strip_prefix("android-").unwrap_or(&s);
        AndroidAbi::from_str(abi).map(Target::Android).map_err(|_| UnknownTarget(s.clone()))
    }
}

/// Locations of compiled artifacts and of their copies inside the
/// application project.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Layout {
    /// Directory of the native library crate, where cargo runs
    pub crate_dir: PathBuf,

    /// Root of the application project receiving the artifacts
    pub output_dir: PathBuf,

    /// Library name without `lib` prefix and extension
    pub lib_name: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            crate_dir: PathBuf::from("."),
            output_dir: PathBuf::from(".."),
            lib_name: NATIVE_LIB_NAME.to_owned(),
        }
    }
}

impl Layout {
    pub fn new(crate_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Layout {
        Layout {
            crate_dir: crate_dir.as_ref().to_owned(),
            output_dir: output_dir.as_ref().to_owned(),
            ..Layout::default()
        }
    }

    pub fn file_name(&self, target: Target) -> String {
        match target {
            Target::Android(_) => format!("lib{}.so", self.lib_name),
            Target::Ios => format!("lib{}.a", self.lib_name),
        }
    }

    /// Where cargo leaves the compiled artifact
    pub fn artifact(&self, target: Target) -> PathBuf {
        let target_dir = match target {
            Target::Android(abi) => abi.rust_target(),
            Target::Ios => "universal",
        };
        self.crate_dir.join("target").join(target_dir).join("release").join(self.file_name(target))
    }

    /// Where the application project expects the artifact
    pub fn destination(&self, target: Target) -> PathBuf {
        match target {
            Target::Android(abi) => self
                .output_dir
                .join("android/src/main/jniLibs")
                .join(abi.to_string())
                .join(self.file_name(target)),
            Target::Ios => self.output_dir.join("ios").join(self.file_name(target)),
        }
    }
}
