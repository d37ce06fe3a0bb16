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
    dead_code,
    missing_docs
)]

//! Main executable for ldk-package: cross-compiles the native node library
//! and places the artifacts into the application project.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process::exit;

use clap::{Parser, ValueHint};
use ldk_bridge::constants::NATIVE_LIB_NAME;
use ldk_bridge::package::{CargoCompile, Layout, Packager, Prebuilt, Target};
use ldk_bridge::LogStyle;
use microservices::shell::LogLevel;

/// Command-line options of the packaging tool
#[derive(Parser, Clone, PartialEq, Eq, Debug)]
#[clap(name = "ldk-package", bin_name = "ldk-package", author, version)]
struct Opts {
    /// Set verbosity level.
    ///
    /// Can be used multiple times to increase verbosity.
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Directory of the native library crate.
    #[clap(
        short = 'C',
        long,
        default_value = ".",
        env = "LDK_PACKAGE_CRATE_DIR",
        value_hint = ValueHint::DirPath
    )]
    crate_dir: PathBuf,

    /// Root of the application project receiving the artifacts.
    #[clap(
        short,
        long,
        default_value = "..",
        env = "LDK_PACKAGE_OUTPUT_DIR",
        value_hint = ValueHint::DirPath
    )]
    output_dir: PathBuf,

    /// Stem of the native library file names.
    #[clap(long, default_value = NATIVE_LIB_NAME)]
    lib_name: String,

    /// Do not compile; package artifacts produced by an earlier build.
    #[clap(long)]
    prebuilt: bool,

    /// Cargo executable used for compilation.
    #[clap(long, env = "CARGO", default_value = "cargo", value_hint = ValueHint::CommandName)]
    cargo: PathBuf,

    /// Targets to package: `ios`, `arm64-v8a`, `armeabi-v7a` or `x86`.
    ///
    /// If omitted, all targets are packaged.
    #[clap(short, long = "target")]
    targets: Vec<Target>,
}

fn main() {
    println!("ldk-package: packaging of the native LDK node library");

    dotenv::dotenv().ok();
    let opts = Opts::parse();
    LogLevel::from_verbosity_flag_count(opts.verbose).apply();
    trace!("Command-line arguments: {:?}", &opts);

    let targets = if opts.targets.is_empty() { Target::all() } else { opts.targets.clone() };

    let mut layout = Layout::new(&opts.crate_dir, &opts.output_dir);
    layout.lib_name = opts.lib_name.clone();
    debug!("Packaging layout: {:?}", layout);

    let packager = if opts.prebuilt {
        Packager::new(layout, Prebuilt)
    } else {
        Packager::new(layout, CargoCompile::with(&opts.cargo))
    };

    for target in targets {
        println!("{} {}", "Packaging".action(), target.announce());
        match packager.package_target(target) {
            Ok(packaged) => println!(
                "{} {} ({} bytes)",
                "Placed".progress(),
                packaged.destination.display().addr(),
                packaged.size.amount()
            ),
            Err(err) => {
                eprintln!("{} {}", "Packaging failed:".err(), err.err_details());
                exit(1);
            }
        }
    }

    println!("{}", "Packaging complete".ended());
}
