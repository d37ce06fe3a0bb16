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

use crate::ChannelNameError;

/// Errors of encoding and decoding wire frames
#[derive(Debug, Display, From, Error)]
#[display(doc_comments)]
#[non_exhaustive]
pub enum Error {
    /// malformed wire frame: {0}
    #[from]
    Json(serde_json::Error),

    /// wire frame version {found} is not supported; this build speaks
    /// version {expected}
    VersionMismatch {
        /// Version this build understands
        expected: u16,
        /// Version found in the frame
        found: u16,
    },

    /// {0}
    #[from]
    ChannelName(ChannelNameError),
}
