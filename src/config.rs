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

use std::path::{Path, PathBuf};

use ldk_bridge_rpc::ChannelName;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::constants::{CONFIG_ENV_PREFIX, NATIVE_LIB_FILE};
use crate::Platform;

#[derive(Debug, Display, From, Error)]
#[display(doc_comments)]
pub enum ConfigError {
    /// unable to read configuration: {0}
    #[from]
    Settings(settings::ConfigError),

    /// unable to expand path `{0}`: {1}
    Expand(String, String),
}

/// Final configuration resulting from data contained in config file,
/// environment variables and command-line options.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Debug, Display, Serialize, Deserialize)]
#[serde(crate = "serde_crate", default)]
#[display(Debug)]
pub struct Config {
    /// Platform to select the native library loading strategy for; defaults
    /// to the platform the process runs on
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub platform: Option<Platform>,

    /// File name of the native shared object
    pub library_file: String,

    /// Directory containing the shared object. If absent, the default
    /// library search path is used
    pub library_dir: Option<PathBuf>,

    /// Method channel the calls are addressed to
    pub channel: ChannelName,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform: None,
            library_file: NATIVE_LIB_FILE.to_owned(),
            library_dir: None,
            channel: ChannelName::default(),
        }
    }
}

impl Config {
    /// Reads configuration from an optional TOML file, overridden by
    /// `LDK_BRIDGE_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut settings = settings::Config::new();
        if let Some(path) = path {
            let path = expand_path(path)?;
            debug!("Reading configuration from {}", path.display());
            settings.merge(settings::File::from(path).required(true))?;
        }
        settings.merge(settings::Environment::with_prefix(CONFIG_ENV_PREFIX))?;

        let mut config: Config = settings.try_into()?;
        config.library_dir = config.library_dir.as_deref().map(expand_path).transpose()?;
        trace!("Effective configuration: {}", config);
        Ok(config)
    }
}

/// Expands `~` and environment variables in a path.
pub fn expand_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|expanded| PathBuf::from(expanded.into_owned()))
        .map_err(|err| ConfigError::Expand(raw.to_string(), err.to_string()))
}
