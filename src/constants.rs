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

/// Stem of the native library name, as used by cargo artifacts
pub const NATIVE_LIB_NAME: &str = "rust_ldk_node";

/// File name of the native shared object opened on platforms that do not
/// link the library into the application image
pub const NATIVE_LIB_FILE: &str = "librust_ldk_node.so";

/// Version of the C ABI exported by the native library which this build can
/// talk to
pub const ABI_VERSION: u32 = 1;

pub const SYM_ABI_VERSION: &str = "ldk_bridge_abi_version";
pub const SYM_DISPATCH: &str = "ldk_bridge_dispatch";
pub const SYM_FREE: &str = "ldk_bridge_free";
// Optional: libraries not exporting it make no concurrency promises
pub const SYM_THREAD_SAFE: &str = "ldk_bridge_thread_safe";

/// Prefix of environment variables overriding configuration file values
pub const CONFIG_ENV_PREFIX: &str = "LDK_BRIDGE";
