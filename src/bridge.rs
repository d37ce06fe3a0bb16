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

use ldk_bridge_rpc::{MethodCall, Value};

use crate::api::NodeApi;
use crate::binding::Binding;
use crate::channel::MethodChannel;
use crate::dispatch::{Dispatch, NativeDispatcher};
use crate::loader::{LoadStrategy, NativeLibrary};
use crate::{Config, DispatchError, Error, Platform};

/// Bootstrapped bridge to the native node library.
///
/// Constructed once at startup and passed explicitly to whatever needs to
/// reach the native side. Calls go through the platform method channel,
/// which answers platform queries itself and forwards everything else to the
/// native library.
pub struct Bridge {
    platform: Platform,
    binding: Binding,
    channel: MethodChannel,
}

impl Bridge {
    /// Resolves and binds the native library. Fails before any call can be
    /// dispatched if the library can't be loaded or bound.
    ///
    /// Construct the bridge once at startup and pass it around. Bootstrapping
    /// again does not open a second copy of the library: the process-wide
    /// handle from [`NativeLibrary::shared`] is bound anew.
    pub fn bootstrap(config: &Config) -> Result<Bridge, Error> {
        let platform = config.platform.clone().unwrap_or_else(Platform::current);
        let strategy = LoadStrategy::with_config(&platform, config);
        info!("Bootstrapping native bridge for {} using {} strategy", platform, strategy);

        let library = NativeLibrary::shared(strategy)?;
        let binding = Binding::new(library)?;
        Ok(Bridge::with_binding(platform, binding, config))
    }

    /// Assembles the bridge around an existing binding.
    pub fn with_binding(platform: Platform, binding: Binding, config: &Config) -> Bridge {
        let native = NativeDispatcher::new(binding.clone(), config.channel.clone());
        let channel =
            MethodChannel::platform(config.channel.clone(), platform.clone()).with_fallback(native);
        Bridge { platform, binding, channel }
    }

    pub fn platform(&self) -> &Platform { &self.platform }

    pub fn binding(&self) -> &Binding { &self.binding }

    pub fn channel(&self) -> &MethodChannel { &self.channel }

    pub fn channel_mut(&mut self) -> &mut MethodChannel { &mut self.channel }

    pub fn node(&self) -> NodeApi<&MethodChannel> { NodeApi::new(&self.channel) }
}

impl Dispatch for Bridge {
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        self.channel.dispatch(call)
    }
}
