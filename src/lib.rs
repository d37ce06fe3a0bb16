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

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    // unused_imports,
    // dead_code
    // missing_docs,
)]

//! Boundary between application code and the prebuilt native LDK node
//! library: resolves the platform-appropriate native image, binds its C ABI
//! and dispatches method calls to it over a named method channel.

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(feature = "shell")]
extern crate clap;

extern crate serde_crate as serde;

pub mod api;
pub mod binding;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod constants;
pub mod dispatch;
mod error;
pub mod loader;
#[cfg(feature = "shell")]
pub mod opts;
pub mod package;
pub mod platform;

pub use bridge::Bridge;
pub use config::Config;
pub use error::{DispatchError, Error, LoadError};
pub use ldk_bridge_rpc as rpc;
pub use platform::Platform;
#[cfg(feature = "shell")]
pub use microservices::cli::LogStyle;
