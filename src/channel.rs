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

//! Named method channel between application code and the platform bridge.

use std::collections::BTreeMap;

use ldk_bridge_rpc::{
    ChannelName, Failure, FailureCode, MethodCall, Value, GET_PLATFORM_VERSION,
};

use crate::dispatch::Dispatch;
use crate::{DispatchError, Platform};

pub type Handler = Box<dyn Fn(Option<Value>) -> Result<Option<Value>, Failure> + Send + Sync>;

/// Method channel with locally registered handlers.
///
/// Calls to methods without a handler go to the fallback dispatcher, if one
/// is attached, and fail as not implemented otherwise.
pub struct MethodChannel {
    name: ChannelName,
    handlers: BTreeMap<String, Handler>,
    fallback: Option<Box<dyn Dispatch + Send + Sync>>,
}

impl MethodChannel {
    pub fn new(name: ChannelName) -> MethodChannel {
        MethodChannel { name, handlers: empty!(), fallback: None }
    }

    /// Channel answering `getPlatformVersion` for the given platform.
    pub fn platform(name: ChannelName, platform: Platform) -> MethodChannel {
        let mut channel = MethodChannel::new(name);
        channel.register(GET_PLATFORM_VERSION, move |_| {
            Ok(Some(Value::Str(platform.version_string())))
        });
        channel
    }

    pub fn with_fallback(mut self, fallback: impl Dispatch + Send + Sync + 'static) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Registers handler for a method, returning the one it replaces.
    pub fn register(
        &mut self,
        method: impl ToString,
        handler: impl Fn(Option<Value>) -> Result<Option<Value>, Failure> + Send + Sync + 'static,
    ) -> Option<Handler> {
        self.handlers.insert(method.to_string(), Box::new(handler))
    }

    pub fn name(&self) -> &ChannelName { &self.name }

    /// Methods handled by the channel itself
    pub fn methods(&self) -> impl Iterator<Item = &str> + '_ {
        self.handlers.keys().map(String::as_str)
    }

    pub fn has_fallback(&self) -> bool { self.fallback.is_some() }
}

impl Dispatch for MethodChannel {
    fn dispatch(&self, call: MethodCall) -> Result<Option<Value>, DispatchError> {
        let handler = match self.handlers.get(&call.method) {
            Some(handler) => handler,
            None => {
                return match self.fallback {
                    Some(ref fallback) => {
                        trace!("Forwarding {} from channel {}", call, self.name);
                        fallback.dispatch(call)
                    }
                    None => {
                        debug!("Channel {} has no handler for `{}`", self.name, call.method);
                        Err(DispatchError::NotImplemented(call.method))
                    }
                }
            }
        };

        let MethodCall { method, args } = call;
        debug!("Channel {} handles `{}`", self.name, method);
        handler(args).map_err(|failure| match failure.code {
            FailureCode::NotImplemented => DispatchError::NotImplemented(method),
            _ => DispatchError::Rejected { method, failure },
        })
    }
}
