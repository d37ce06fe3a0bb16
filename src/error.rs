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

use std::path::PathBuf;

use ldk_bridge_rpc::{self as rpc, Failure};

use crate::config::ConfigError;
use crate::package::PackageError;

/// Failures to resolve or bind the native library. All of them are fatal at
/// startup: there is no fallback library and no retry.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum LoadError {
    /// native library file {0:?} does not exist
    NotFound(PathBuf),

    /// unable to open native library `{name}`: {details}
    Open { name: String, details: String },

    /// native library does not export symbol `{symbol}`: {details}
    MissingSymbol { symbol: String, details: String },

    /// native library implements ABI version {found}, while this build
    /// requires version {expected}
    AbiMismatch { expected: u32, found: u32 },
}

/// Failures of a single call across the native boundary. These are always
/// distinct from a successful call returning no value.
#[derive(Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum DispatchError {
    /// method `{0}` is not implemented by the native side
    NotImplemented(String),

    /// native side rejected `{method}`: {failure}
    Rejected { method: String, failure: Failure },

    /// native side faulted with status {status} while executing `{method}`
    Fault { method: String, status: i32 },

    /// native side returned no reply frame for `{0}`
    NoReply(String),

    /// method `{method}` returned {found} where {expected} was expected
    UnexpectedReply { method: String, expected: &'static str, found: &'static str },

    /// method `{method}` returned a malformed record: {details}
    MalformedRecord { method: String, details: String },

    /// unable to encode arguments of `{method}`: {details}
    Arguments { method: String, details: String },

    /// wire contract violation: {0}
    #[from]
    Wire(rpc::Error),
}

#[derive(Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum Error {
    /// unable to load native library: {0}
    #[from]
    Load(LoadError),

    /// {0}
    #[from]
    Dispatch(DispatchError),

    /// packaging failed: {0}
    #[from]
    Package(PackageError),

    /// configuration error: {0}
    #[from]
    Config(ConfigError),
}
