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

//! Command-line options shared by the binaries.

use std::path::PathBuf;

use clap::{Parser, ValueHint};
use ldk_bridge_rpc::ChannelName;

use crate::config::ConfigError;
use crate::{Config, Platform};

/// Shared options used by different binaries
#[derive(Parser, Clone, PartialEq, Eq, Debug)]
pub struct Opts {
    /// Set verbosity level.
    ///
    /// Can be used multiple times to increase verbosity.
    #[clap(short, long, global = true, parse(from_occurrences))]
    pub verbose: u8,

    /// Path for the configuration file.
    ///
    /// NB: Command-line options override configuration file values.
    #[clap(
        short,
        long,
        global = true,
        env = "LDK_BRIDGE_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Platform to pick the native library loading strategy for.
    ///
    /// Defaults to the platform of the running process.
    #[clap(short, long, global = true, env = "LDK_BRIDGE_PLATFORM")]
    pub platform: Option<Platform>,

    /// File name of the native shared object.
    #[clap(short = 'l', long, global = true, env = "LDK_BRIDGE_LIBRARY_FILE")]
    pub library_file: Option<String>,

    /// Directory containing the native shared object.
    ///
    /// If absent, the default library search path is used.
    #[clap(
        short = 'L',
        long,
        global = true,
        env = "LDK_BRIDGE_LIBRARY_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub library_dir: Option<PathBuf>,

    /// Method channel to address calls to.
    #[clap(long, global = true, env = "LDK_BRIDGE_CHANNEL")]
    pub channel: Option<ChannelName>,
}

impl Opts {
    /// Configuration file values with command-line overrides applied
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(ref platform) = self.platform {
            config.platform = Some(platform.clone());
        }
        if let Some(ref library_file) = self.library_file {
            config.library_file = library_file.clone();
        }
        if let Some(ref library_dir) = self.library_dir {
            config.library_dir = Some(crate::config::expand_path(library_dir)?);
        }
        if let Some(ref channel) = self.channel {
            config.channel = channel.clone();
        }
        Ok(config)
    }
}
