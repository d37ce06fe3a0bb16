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

use std::path::PathBuf;
use std::process::Command;

use super::{Layout, PackageError, Target};

/// Produces the native artifact for a target
pub trait Compile {
    fn compile(&self, target: Target, layout: &Layout) -> Result<(), PackageError>;
}

/// Cross-compiles with cargo: `cargo build --release --target <triple>` for
/// Android ABIs and `cargo lipo --release` for the iOS universal archive.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CargoCompile {
    pub cargo: PathBuf,
}

impl Default for CargoCompile {
    fn default() -> Self { CargoCompile { cargo: PathBuf::from("cargo") } }
}

impl CargoCompile {
    pub fn with(cargo: impl Into<PathBuf>) -> CargoCompile { CargoCompile { cargo: cargo.into() } }

    pub fn command(&self, target: Target, layout: &Layout) -> Command {
        let mut cmd = Command::new(&self.cargo);
        cmd.current_dir(&layout.crate_dir);
        match target {
            Target::Android(abi) => cmd.args(["build", "--release", "--target", abi.rust_target()]),
            Target::Ios => cmd.args(["lipo", "--release"]),
        };
        cmd
    }
}

impl Compile for CargoCompile {
    fn compile(&self, target: Target, layout: &Layout) -> Result<(), PackageError> {
        let mut cmd = self.command(target, layout);
        let command = format!("{:?}", cmd);
        info!("Compiling {}: {}", target, command);

        let status = cmd
            .status()
            .map_err(|err| PackageError::Spawn { command, details: err.to_string() })?;
        if !status.success() {
            error!("Compilation for {} failed with {}", target, status);
            return Err(PackageError::Compile { target, status: status.to_string() });
        }
        Ok(())
    }
}

/// Uses artifacts compiled beforehand
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Prebuilt;

impl Compile for Prebuilt {
    fn compile(&self, target: Target, _: &Layout) -> Result<(), PackageError> {
        debug!("Using prebuilt artifact for {}", target);
        Ok(())
    }
}
