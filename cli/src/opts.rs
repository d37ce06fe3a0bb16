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

use std::str::FromStr;

use amplify::hex::FromHex;
use ldk_bridge::opts::Opts as SharedOpts;
use ldk_bridge_rpc::Value;

/// Command-line tool for working with the native LDK node library
#[derive(Parser, Clone, PartialEq, Eq, Debug)]
#[clap(name = "ldk-cli", bin_name = "ldk-cli", author, version)]
pub struct Opts {
    /// These params can be read also from the configuration file, not just
    /// command-line args or environment variables
    #[clap(flatten)]
    pub shared: SharedOpts,

    /// Command to execute
    #[clap(subcommand)]
    pub command: Command,
}

/// Command-line commands:
#[derive(Subcommand, Clone, PartialEq, Eq, Debug, Display)]
pub enum Command {
    /// Print the strategy used to locate the native library, without loading
    /// it
    #[display("strategy")]
    Strategy,

    /// Load the native library and report its ABI version and concurrency
    /// contract
    #[display("inspect")]
    Inspect,

    /// Print the version string of the platform the bridge runs on
    #[display("platform-version")]
    PlatformVersion,

    /// List methods exported by the native node library
    #[display("methods")]
    Methods,

    /// General information about the native node: its id, listening address
    /// and on-chain balances
    #[display("info")]
    Info,

    /// Invoke a method on the method channel
    #[display("call<{method}>")]
    Call {
        /// Name of the method
        method: String,

        /// Argument to pass, as `<type>:<value>` where type is one of `str`,
        /// `int`, `uint`, `bool` or `hex`.
        ///
        /// If used multiple times, arguments are passed as a list.
        #[clap(short, long = "arg")]
        args: Vec<Arg>,
    },
}

/// Typed method argument given on the command line
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[display(inner)]
pub struct Arg(pub Value);

#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum ArgError {
    /// argument `{0}` must be given as `<type>:<value>`
    NoType(String),

    /// unknown argument type `{0}`; use one of `str`, `int`, `uint`, `bool`
    /// or `hex`
    UnknownType(String),

    /// invalid {0} value `{1}`
    InvalidValue(&'static str, String),
}

impl FromStr for Arg {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ty, val) = s.split_once(':').ok_or_else(|| ArgError::NoType(s.to_owned()))?;
        let invalid = |ty: &'static str| ArgError::InvalidValue(ty, val.to_owned());
        let value = match ty {
            "str" => Value::from(val),
            "int" => Value::Int(val.parse().map_err(|_| invalid("int"))?),
            "uint" => Value::Uint(val.parse().map_err(|_| invalid("uint"))?),
            "bool" => Value::Bool(val.parse().map_err(|_| invalid("bool"))?),
            "hex" => Value::Bytes(Vec::<u8>::from_hex(val).map_err(|_| invalid("hex"))?),
            other => return Err(ArgError::UnknownType(other.to_owned())),
        };
        Ok(Arg(value))
    }
}

impl Command {
    /// Packs command-line arguments into a single call argument
    pub fn call_args(args: Vec<Arg>) -> Option<Value> {
        let mut values: Vec<Value> = args.into_iter().map(|arg| arg.0).collect();
        match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(Value::List(values)),
        }
    }
}

#[cfg(test)]
mod test {
    use clap::Parser;

    use super::*;

    #[test]
    fn typed_args() {
        assert_eq!("str:hello".parse::<Arg>(), Ok(Arg(Value::from("hello"))));
        assert_eq!("str:".parse::<Arg>(), Ok(Arg(Value::from(""))));
        assert_eq!("str:a:b".parse::<Arg>(), Ok(Arg(Value::from("a:b"))));
        assert_eq!("int:-5".parse::<Arg>(), Ok(Arg(Value::Int(-5))));
        assert_eq!("uint:21000".parse::<Arg>(), Ok(Arg(Value::Uint(21000))));
        assert_eq!("bool:true".parse::<Arg>(), Ok(Arg(Value::Bool(true))));
        assert_eq!("hex:dead".parse::<Arg>(), Ok(Arg(Value::Bytes(vec![0xde_u8, 0xad]))));
    }

    #[test]
    fn bad_args() {
        assert_eq!("hello".parse::<Arg>(), Err(ArgError::NoType(s!("hello"))));
        assert_eq!("float:1.0".parse::<Arg>(), Err(ArgError::UnknownType(s!("float"))));
        assert_eq!("uint:-1".parse::<Arg>(), Err(ArgError::InvalidValue("uint", s!("-1"))));
        assert!("hex:xyz".parse::<Arg>().is_err());
    }

    #[test]
    fn packing() {
        assert_eq!(Command::call_args(vec![]), None);
        assert_eq!(Command::call_args(vec![Arg(Value::Uint(1))]), Some(Value::Uint(1)));
        assert_eq!(
            Command::call_args(vec![Arg(Value::Uint(1)), Arg(Value::from("x"))]),
            Some(Value::List(vec![Value::Uint(1), Value::from("x")]))
        );
    }

    #[test]
    fn parse_call() {
        let opts = Opts::try_parse_from([
            "ldk-cli",
            "-vv",
            "call",
            "receivePayment",
            "-a",
            "uint:1000",
            "--arg",
            "str:coffee",
        ])
        .unwrap();
        assert_eq!(opts.shared.verbose, 2);
        assert_eq!(opts.command, Command::Call {
            method: s!("receivePayment"),
            args: vec![Arg(Value::Uint(1000)), Arg(Value::from("coffee"))],
        });
        assert_eq!(opts.command.to_string(), "call<receivePayment>");
    }
}
