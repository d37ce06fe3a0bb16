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

use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_CHANNEL;

/// Longest channel name accepted, in bytes
pub const CHANNEL_NAME_MAX_LEN: usize = 128;

/// Errors in method channel names
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, Error)]
#[display(doc_comments)]
pub enum ChannelNameError {
    /// method channel name must not be empty
    Empty,

    /// method channel name is {0} bytes long, exceeding the limit of 128 bytes
    TooLong(usize),

    /// method channel name contains prohibited character `{0}`; only ASCII
    /// letters, digits and `_`, `.`, `/`, `-` are allowed
    InvalidChar(char),
}

/// Identifier of a named method channel between application code and the
/// platform-specific native bridge.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[derive(Serialize, Deserialize)]
#[serde(crate = "serde_crate", try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for ChannelName {
    fn default() -> Self { ChannelName(DEFAULT_CHANNEL.to_owned()) }
}

impl Display for ChannelName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for ChannelName {
    type Err = ChannelNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { ChannelName::try_from(s.to_owned()) }
}

impl TryFrom<String> for ChannelName {
    type Error = ChannelNameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        if name.is_empty() {
            return Err(ChannelNameError::Empty);
        }
        if name.len() > CHANNEL_NAME_MAX_LEN {
            return Err(ChannelNameError::TooLong(name.len()));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')))
        {
            return Err(ChannelNameError::InvalidChar(c));
        }
        Ok(ChannelName(name))
    }
}

impl From<ChannelName> for String {
    fn from(name: ChannelName) -> Self { name.0 }
}
