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

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ChannelName, Error, Value, WIRE_VERSION};

/// Named operation with an optional argument payload.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
pub struct MethodCall {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl ToString) -> MethodCall {
        MethodCall { method: method.to_string(), args: None }
    }

    pub fn with(method: impl ToString, args: impl Into<Value>) -> MethodCall {
        MethodCall { method: method.to_string(), args: Some(args.into()) }
    }
}

impl Display for MethodCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.args {
            Some(args) => write!(f, "{}({})", self.method, args),
            None => write!(f, "{}()", self.method),
        }
    }
}

/// Call addressed to a method channel.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
#[display("{channel}::{call}")]
pub struct Request {
    pub channel: ChannelName,
    pub call: MethodCall,
}

impl Request {
    pub fn encode(&self) -> Result<Vec<u8>, Error> { encode(self) }

    pub fn decode(data: impl AsRef<[u8]>) -> Result<Request, Error> { decode(data.as_ref()) }
}

/// Answer of the native side to a [`Request`].
#[derive(Clone, PartialEq, Eq, Debug, Display, From)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", rename_all = "snake_case")]
pub enum Reply {
    /// Call completed; the value is absent for methods returning nothing.
    #[display("success({0:?})")]
    Success(Option<Value>),

    #[display("failure({0})")]
    #[from]
    Failure(Failure),
}

impl Reply {
    pub fn success(value: impl Into<Value>) -> Reply { Reply::Success(Some(value.into())) }

    pub fn encode(&self) -> Result<Vec<u8>, Error> { encode(self) }

    pub fn decode(data: impl AsRef<[u8]>) -> Result<Reply, Error> { decode(data.as_ref()) }
}

/// Failure reported by the native side
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
#[display("{info} (code {code})")]
pub struct Failure {
    /// Failure code
    pub code: FailureCode,

    /// Detailed information about the failure
    pub info: String,
}

impl Failure {
    pub fn not_implemented(method: &str) -> Failure {
        Failure {
            code: FailureCode::NotImplemented,
            info: format!("method `{}` is not implemented", method),
        }
    }

    pub fn invalid_argument(info: impl ToString) -> Failure {
        Failure { code: FailureCode::InvalidArgument, info: info.to_string() }
    }

    pub fn internal(info: impl ToString) -> Failure {
        Failure { code: FailureCode::Internal, info: info.to_string() }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", from = "u16", into = "u16")]
pub enum FailureCode {
    /// The method is unknown to the native side
    #[display("not-implemented")]
    NotImplemented,

    /// The method exists but rejected its arguments
    #[display("invalid-argument")]
    InvalidArgument,

    /// Internal fault inside the native library
    #[display("internal")]
    Internal,

    #[display("{0}")]
    Other(u16),
}

impl From<u16> for FailureCode {
    fn from(code: u16) -> Self {
        match code {
            1 => FailureCode::NotImplemented,
            2 => FailureCode::InvalidArgument,
            3 => FailureCode::Internal,
            other => FailureCode::Other(other),
        }
    }
}

impl From<FailureCode> for u16 {
    fn from(code: FailureCode) -> Self {
        match code {
            FailureCode::NotImplemented => 1,
            FailureCode::InvalidArgument => 2,
            FailureCode::Internal => 3,
            FailureCode::Other(other) => other,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate")]
struct Frame<T> {
    version: u16,
    body: T,
}

#[derive(Deserialize)]
#[serde(crate = "serde_crate")]
struct Header {
    version: u16,
}

fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(&Frame { version: WIRE_VERSION, body }).map_err(Error::from)
}

fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, Error> {
    // Version is checked before the body so that frames of a future layout
    // are reported as such and not as malformed.
    let header: Header = serde_json::from_slice(data)?;
    if header.version != WIRE_VERSION {
        warn!("Rejecting wire frame of version {}", header.version);
        return Err(Error::VersionMismatch { expected: WIRE_VERSION, found: header.version });
    }
    let frame: Frame<T> = serde_json::from_slice(data)?;
    Ok(frame.body)
}
