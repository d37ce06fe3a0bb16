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

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code
    // missing_docs,
)]

//! Command-line interface to the native LDK node library

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate log;
#[macro_use]
extern crate clap;

mod command;
mod opts;

use std::process::exit;

use clap::Parser;
use ldk_bridge::LogStyle;
use microservices::shell::{Exec, LogLevel};

pub use crate::opts::{Command, Opts};

fn main() {
    println!("ldk-cli: command-line tool for working with the native LDK node library");

    dotenv::dotenv().ok();
    let opts = Opts::parse();
    LogLevel::from_verbosity_flag_count(opts.shared.verbose).apply();

    trace!("Command-line arguments: {:?}", opts);

    let mut config = match opts.shared.config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err.err());
            exit(1);
        }
    };
    trace!("Bridge configuration: {:?}", config);

    trace!("Executing command: {:?}", opts.command);
    if let Err(err) = opts.command.exec(&mut config) {
        eprintln!("{}", err.err());
        exit(1);
    }
}
