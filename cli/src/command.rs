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

use ldk_bridge::api::method;
use ldk_bridge::channel::MethodChannel;
use ldk_bridge::dispatch::Dispatch;
use ldk_bridge::loader::LoadStrategy;
use ldk_bridge::{Bridge, Config, Error, LogStyle, Platform};
use ldk_bridge_rpc::GET_PLATFORM_VERSION;
use microservices::shell::Exec;

use crate::opts::Command;

impl Exec for Command {
    type Client = Config;
    type Error = Error;

    fn exec(self, config: &mut Self::Client) -> Result<(), Self::Error> {
        debug!("Performing {:?}: {}", self, self);
        let platform = config.platform.clone().unwrap_or_else(Platform::current);
        match self {
            Command::Strategy => {
                let strategy = LoadStrategy::with_config(&platform, config);
                println!("{}: {}", platform.announce(), strategy.addr());
            }

            Command::Inspect => {
                let bridge = Bridge::bootstrap(config)?;
                let binding = bridge.binding();
                println!("Strategy: {}", binding.library().strategy().addr());
                println!("ABI version: {}", binding.abi_version().amount());
                println!("Concurrency: {}", binding.concurrency().announce());
                println!("Channel: {}", bridge.channel().name());
            }

            Command::PlatformVersion => {
                // Answered by the platform channel itself, no native code needed
                let channel = MethodChannel::platform(config.channel.clone(), platform);
                let version = channel.invoke_str(GET_PLATFORM_VERSION, None)?;
                println!("{}", version.unwrap_or_default());
            }

            Command::Methods => {
                println!("{}", GET_PLATFORM_VERSION);
                for name in method::ALL {
                    println!("{}", name);
                }
            }

            Command::Info => {
                let bridge = Bridge::bootstrap(config)?;
                let node = bridge.node();
                println!("Node id: {}", node.node_id()?.addr());
                match node.listening_address()? {
                    Some(addr) => println!("Listening on: {}", addr.addr()),
                    None => println!("Listening on: {}", "none".ended()),
                }
                println!("Spendable: {} sat", node.spendable_onchain_balance_sats()?.amount());
                println!("Total: {} sat", node.total_onchain_balance_sats()?.amount());
            }

            Command::Call { method, args } => {
                let bridge = Bridge::bootstrap(config)?;
                let args = Command::call_args(args);
                match bridge.invoke(&method, args)? {
                    Some(value) => println!("{}", value),
                    None => println!("{}", "no value returned".ended()),
                }
            }
        }
        Ok(())
    }
}
