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

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Operating system the bridge runs on. Selects the strategy for locating
/// the native library image.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Platform {
    Android,
    Ios,
    MacOs,
    Linux,
    Windows,
    Other(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display("platform identifier must not be empty")]
pub struct PlatformParseError;

impl Platform {
    /// Platform this process was compiled for
    pub fn current() -> Platform { Platform::from_os(std::env::consts::OS) }

    /// Maps target OS identifiers (as in `std::env::consts::OS`)
    pub fn from_os(os: &str) -> Platform {
        match os {
            "android" => Platform::Android,
            "ios" => Platform::Ios,
            "macos" => Platform::MacOs,
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            other => Platform::Other(other.to_owned()),
        }
    }

    pub fn os_id(&self) -> &str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Other(os) => os,
        }
    }

    /// Human-readable platform name
    pub fn marketing_name(&self) -> &str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Windows => "Windows",
            Platform::Other(os) => os,
        }
    }

    /// Version string reported over the method channel, like `Android 13`.
    ///
    /// The OS version can only be read for the platform the process runs on;
    /// any other platform reports `unknown` instead of the host version.
    pub fn version_string(&self) -> String {
        let version = if *self == Platform::current() { os_version() } else { None };
        let version = version.unwrap_or_else(|| UNKNOWN_VERSION.to_owned());
        format!("{} {}", self.marketing_name(), version)
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.os_id()) }
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PlatformParseError);
        }
        Ok(Platform::from_os(&s.to_lowercase()))
    }
}

/// Reported when the OS version can't be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// User-visible release of the running Android system
/// (`ro.build.version.release`)
#[cfg(target_os = "android")]
pub fn os_version() -> Option<String> {
    use std::ffi::CStr;

    // PROP_VALUE_MAX from <sys/system_properties.h>
    let mut value = [0 as libc::c_char; 92];
    let name = b"ro.build.version.release\0";
    let len = unsafe {
        libc::__system_property_get(name.as_ptr() as *const libc::c_char, value.as_mut_ptr())
    };
    if len <= 0 {
        warn!("Android release property is not set");
        return None;
    }
    let release = unsafe { CStr::from_ptr(value.as_ptr()) };
    non_empty(release.to_string_lossy().into_owned())
}

/// Product version of the running Apple OS (`kern.osproductversion`)
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub fn os_version() -> Option<String> {
    use std::ptr;

    let mut value = [0u8; 64];
    let mut len = value.len();
    let name = b"kern.osproductversion\0";
    let res = unsafe {
        libc::sysctlbyname(
            name.as_ptr() as *const libc::c_char,
            value.as_mut_ptr() as *mut libc::c_void,
            &mut len,
            ptr::null_mut(),
            0,
        )
    };
    if res != 0 {
        warn!("Unable to read kern.osproductversion sysctl");
        return None;
    }
    let value = &value[..len.min(value.len())];
    let end = value.iter().position(|b| *b == 0).unwrap_or(value.len());
    non_empty(String::from_utf8_lossy(&value[..end]).into_owned())
}

/// Kernel release, the only OS version generic unix systems share
#[cfg(all(unix, not(any(target_os = "android", target_os = "ios", target_os = "macos"))))]
pub fn os_version() -> Option<String> {
    non_empty(nix::sys::utsname::uname().release().to_owned())
}

#[cfg(not(unix))]
pub fn os_version() -> Option<String> { None }

#[cfg_attr(not(unix), allow(dead_code))]
fn non_empty(version: String) -> Option<String> {
    let version = version.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn os_identifiers() {
        for os in ["android", "ios", "macos", "linux", "windows", "freebsd"] {
            assert_eq!(Platform::from_os(os).os_id(), os);
        }
        assert_eq!(Platform::from_str(" MacOS ").unwrap(), Platform::MacOs);
        assert_eq!(Platform::from_str("freebsd").unwrap(), Platform::Other(s!("freebsd")));
        assert_eq!(Platform::from_str(""), Err(PlatformParseError));
    }

    #[test]
    fn current_matches_target() {
        assert_eq!(Platform::current().to_string(), std::env::consts::OS);
    }

    #[test]
    fn version_string() {
        let current = Platform::current();
        let version = current.version_string();
        assert!(version.starts_with(&format!("{} ", current.marketing_name())));
        assert!(version.len() > current.marketing_name().len() + 1);
    }

    #[test]
    fn foreign_platform_version_unknown() {
        for platform in [Platform::Android, Platform::Ios, Platform::MacOs, Platform::Windows] {
            if platform == Platform::current() {
                continue;
            }
            assert_eq!(
                platform.version_string(),
                format!("{} unknown", platform.marketing_name())
            );
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_reports_kernel_release() {
        let release = nix::sys::utsname::uname().release().trim().to_owned();
        assert_eq!(os_version(), Some(release.clone()));
        assert_eq!(Platform::Linux.version_string(), format!("Linux {}", release));
    }
}
