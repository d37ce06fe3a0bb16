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

//! Packaging of the cross-compiled native library into the application
//! project: a shared object per Android ABI and a static archive for iOS.

mod compile;
mod target;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use compile::{CargoCompile, Compile, Prebuilt};
pub use target::{AndroidAbi, Layout, Target, UnknownTarget};

#[derive(Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum PackageError {
    /// compiled artifact {0:?} is missing; the cross-compilation toolchain
    /// for the target is likely not installed
    MissingArtifact(PathBuf),

    /// I/O error on {path:?}: {details}
    Io { path: PathBuf, details: String },

    /// unable to launch `{command}`: {details}
    Spawn { command: String, details: String },

    /// compilation for {target} failed with {status}
    Compile { target: Target, status: String },
}

impl PackageError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> PackageError + '_ {
        move |err| PackageError::Io { path: path.to_owned(), details: err.to_string() }
    }
}

/// Artifact placed into the application project
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
#[display("{target}: {destination:?} ({size} bytes)")]
pub struct Packaged {
    pub target: Target,
    pub artifact: PathBuf,
    pub destination: PathBuf,
    pub size: u64,
}

pub struct Packager {
    layout: Layout,
    compiler: Box<dyn Compile>,
}

impl Packager {
    pub fn new(layout: Layout, compiler: impl Compile + 'static) -> Packager {
        Packager { layout, compiler: Box::new(compiler) }
    }

    pub fn layout(&self) -> &Layout { &self.layout }

    /// Packages targets in order, stopping at the first failure.
    pub fn package(&self, targets: &[Target]) -> Result<Vec<Packaged>, PackageError> {
        targets.iter().map(|target| self.package_target(*target)).collect()
    }

    /// Removes the previously packaged artifact, compiles a new one and
    /// copies it into place.
    ///
    /// The old artifact is gone even if compilation fails, so a failed run
    /// never leaves an outdated library looking current.
    pub fn package_target(&self, target: Target) -> Result<Packaged, PackageError> {
        let destination = self.layout.destination(target);
        if destination.exists() {
            info!("Removing stale {}", destination.display());
            fs::remove_file(&destination).map_err(PackageError::io(&destination))?;
        }

        self.compiler.compile(target, &self.layout)?;

        let artifact = self.layout.artifact(target);
        if !artifact.is_file() {
            error!("No compiled artifact for {} at {}", target, artifact.display());
            return Err(PackageError::MissingArtifact(artifact));
        }

        if let Some(dir) = destination.parent() {
            fs::create_dir_all(dir).map_err(PackageError::io(dir))?;
        }
        let size = fs::copy(&artifact, &destination).map_err(PackageError::io(&destination))?;
        info!("Packaged {} into {}", target, destination.display());

        Ok(Packaged { target, artifact, destination, size })
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::*;

    fn seed_artifacts(layout: &Layout, targets: &[Target]) {
        for target in targets {
            let artifact = layout.artifact(*target);
            fs::create_dir_all(artifact.parent().unwrap()).unwrap();
            fs::write(&artifact, format!("{} build", target)).unwrap();
        }
    }

    fn layout(root: &Path) -> Layout { Layout::new(root.join("rust"), root.to_owned()) }

    #[test]
    fn packages_all_targets() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        seed_artifacts(&layout, &Target::all());

        let packaged = Packager::new(layout.clone(), Prebuilt).package(&Target::all()).unwrap();
        assert_eq!(packaged.len(), 4);
        for item in packaged {
            assert_eq!(item.destination, layout.destination(item.target));
            assert_eq!(fs::read_to_string(&item.destination).unwrap(), format!("{} build", item.target));
        }
        assert!(dir.path().join("android/src/main/jniLibs/arm64-v8a/librust_ldk_node.so").is_file());
        assert!(dir.path().join("ios/librust_ldk_node.a").is_file());
    }

    #[test]
    fn idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        seed_artifacts(&layout, &Target::all());
        let packager = Packager::new(layout.clone(), Prebuilt);

        let first = packager.package(&Target::all()).unwrap();
        let contents: Vec<_> =
            first.iter().map(|item| fs::read(&item.destination).unwrap()).collect();
        let second = packager.package(&Target::all()).unwrap();
        assert_eq!(first, second);
        for (item, content) in second.iter().zip(contents) {
            assert_eq!(fs::read(&item.destination).unwrap(), content);
            let siblings = fs::read_dir(item.destination.parent().unwrap()).unwrap().count();
            assert_eq!(siblings, 1);
        }
    }

    #[test]
    fn stale_ios_archive_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        let stale = dir.path().join("ios/librust_ldk_node.a");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "stale").unwrap();
        fs::create_dir_all(dir.path().join("rust/target/universal/release")).unwrap();
        fs::write(dir.path().join("rust/target/universal/release/librust_ldk_node.a"), "fresh")
            .unwrap();

        Packager::new(layout, Prebuilt).package(&[Target::Ios]).unwrap();
        assert_eq!(fs::read_to_string(&stale).unwrap(), "fresh");
    }

    #[test]
    fn missing_artifact_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        seed_artifacts(&layout, &[Target::Android(AndroidAbi::Arm64V8a)]);
        let x86 = Target::Android(AndroidAbi::X86);
        let stale = layout.destination(x86);
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();

        let err = Packager::new(layout.clone(), Prebuilt)
            .package(&[Target::Android(AndroidAbi::Arm64V8a), x86])
            .unwrap_err();
        assert_eq!(err, PackageError::MissingArtifact(layout.artifact(x86)));
        assert!(!stale.exists());
        assert!(layout.destination(Target::Android(AndroidAbi::Arm64V8a)).is_file());
    }

    struct Recording(RefCell<Vec<Target>>);

    impl Compile for &'static Recording {
        fn compile(&self, target: Target, layout: &Layout) -> Result<(), PackageError> {
            self.0.borrow_mut().push(target);
            seed_artifacts(layout, &[target]);
            Ok(())
        }
    }

    #[test]
    fn compiles_before_copying() {
        let dir = tempfile::tempdir().unwrap();
        let recording: &'static Recording = Box::leak(Box::new(Recording(RefCell::new(vec![]))));
        let packaged = Packager::new(layout(dir.path()), recording)
            .package(&[Target::Ios, Target::Android(AndroidAbi::ArmeabiV7a)])
            .unwrap();
        assert_eq!(packaged.len(), 2);
        assert_eq!(*recording.0.borrow(), vec![
            Target::Ios,
            Target::Android(AndroidAbi::ArmeabiV7a)
        ]);
    }

    #[test]
    fn failed_compilation_stops() {
        struct Failing;
        impl Compile for Failing {
            fn compile(&self, target: Target, _: &Layout) -> Result<(), PackageError> {
                Err(PackageError::Compile { target, status: s!("exit status: 101") })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let err = Packager::new(layout(dir.path()), Failing).package(&Target::all()).unwrap_err();
        assert!(matches!(err, PackageError::Compile { target: Target::Android(AndroidAbi::Arm64V8a), .. }));
    }
}
