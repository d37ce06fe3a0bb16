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
    unused_imports,
    dead_code
    // missing_docs,
)]

//! Wire contract for calls crossing the boundary between application code
//! and the native LDK node library.
//!
//! Every call is a [`Request`] carrying a [`MethodCall`] addressed to a named
//! method channel; every answer is a [`Reply`]. Both travel as versioned JSON
//! frames, so a library built against a different contract is rejected
//! instead of being misread.

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate log;
extern crate serde_crate as serde;

mod channel_name;
mod error;
mod messages;
mod value;

pub use channel_name::{ChannelName, ChannelNameError};
pub use error::Error;
pub use messages::{Failure, FailureCode, MethodCall, Reply, Request};
pub use value::Value;

/// Version of the wire frame layout. Bumped on any incompatible change of
/// [`Request`] or [`Reply`] encoding.
pub const WIRE_VERSION: u16 = 1;

/// Name of the method channel used by default.
pub const DEFAULT_CHANNEL: &str = "rust_ldk_node";

/// Method answered by the platform side of the method channel.
pub const GET_PLATFORM_VERSION: &str = "getPlatformVersion";
