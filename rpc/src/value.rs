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

use serde::{Deserialize, Serialize};

/// Value crossing the native boundary.
///
/// The set of variants is closed: anything the native library accepts or
/// returns is expressed through these primitives. Calls taking several
/// arguments pass them positionally inside [`Value::List`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Int(n) }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self { Value::Uint(n) }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self { Value::Uint(n as u64) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::Str(s) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Str(s.to_owned()) }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self { Value::Bytes(data) }
}

impl Value {
    /// Wraps positional arguments into a single value
    pub fn args(args: impl IntoIterator<Item = Value>) -> Value {
        Value::List(args.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns unsigned integer, also accepting non-negative signed ones
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            Value::Int(n) if *n >= 0 => Some(*n as u64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(data) => Some(data),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => Display::fmt(b, f),
            Value::Int(n) => Display::fmt(n, f),
            Value::Uint(n) => Display::fmt(n, f),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bytes(data) => {
                f.write_str("0x")?;
                data.iter().try_for_each(|byte| write!(f, "{:02x}", byte))
            }
            Value::List(items) => {
                for (no, item) in items.iter().enumerate() {
                    if no > 0 {
                        f.write_str(", ")?;
                    }
                    Display::fmt(item, f)?;
                }
                Ok(())
            }
        }
    }
}
