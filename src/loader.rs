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

//! Library resolver: picks the native code image for the running platform
//! and opens it.

use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::constants::NATIVE_LIB_FILE;
use crate::{Config, LoadError, Platform};

/// Where the native library code lives.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum LoadStrategy {
    /// Symbols statically linked into the application and already loaded
    /// into the process
    #[display("process")]
    Process,

    /// Symbols exported by the main executable image
    #[display("executable")]
    Executable,

    /// Shared object opened by name; a bare file name is looked up in the
    /// default library search path
    #[display("shared-object<{0:?}>")]
    SharedObject(PathBuf),
}

impl LoadStrategy {
    /// Deterministic choice of a single strategy for each platform.
    pub fn for_platform(platform: &Platform) -> LoadStrategy {
        match platform {
            Platform::Ios => LoadStrategy::Process,
            Platform::MacOs => LoadStrategy::Executable,
            _ => LoadStrategy::SharedObject(PathBuf::from(NATIVE_LIB_FILE)),
        }
    }

    /// Same as [`LoadStrategy::for_platform`], with the shared object name
    /// and location taken from the configuration. Strategies binding to the
    /// application image are not affected.
    pub fn with_config(platform: &Platform, config: &Config) -> LoadStrategy {
        match LoadStrategy::for_platform(platform) {
            LoadStrategy::SharedObject(_) => {
                let path = match config.library_dir {
                    Some(ref dir) => dir.join(&config.library_file),
                    None => PathBuf::from(&config.library_file),
                };
                LoadStrategy::SharedObject(path)
            }
            strategy => strategy,
        }
    }

    pub fn is_in_image(&self) -> bool { !matches!(self, LoadStrategy::SharedObject(_)) }
}

lazy_static! {
    /// Images resolved so far; one handle per image for the whole process
    static ref RESOLVED: Mutex<Vec<Arc<NativeLibrary>>> = Mutex::new(vec![]);
}

/// Handle to the loaded native code image.
///
/// The image is never unloaded: function pointers taken from it stay valid
/// until the process exits. Share the handle with `Arc` instead of resolving
/// it again.
pub struct NativeLibrary {
    strategy: LoadStrategy,
    inner: ManuallyDrop<libloading::Library>,
}

impl NativeLibrary {
    pub fn resolve(strategy: LoadStrategy) -> Result<NativeLibrary, LoadError> {
        debug!("Resolving native library with {} strategy", strategy);
        let inner = match strategy {
            LoadStrategy::Process | LoadStrategy::Executable => this_image()?,
            LoadStrategy::SharedObject(ref path) => open(path)?,
        };
        info!("Native library bound via {}", strategy);
        Ok(NativeLibrary { strategy, inner: ManuallyDrop::new(inner) })
    }

    /// Process-wide handle for the strategy. The image is resolved on the
    /// first request only; later requests with the same strategy get the same
    /// handle instead of opening the library again. Failures are not cached.
    pub fn shared(strategy: LoadStrategy) -> Result<Arc<NativeLibrary>, LoadError> {
        let mut resolved = RESOLVED.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(library) = resolved.iter().find(|library| library.strategy == strategy) {
            debug!("Reusing native library bound via {}", strategy);
            return Ok(library.clone());
        }
        let library = Arc::new(NativeLibrary::resolve(strategy)?);
        resolved.push(library.clone());
        Ok(library)
    }

    pub fn strategy(&self) -> &LoadStrategy { &self.strategy }

    /// Looks up an exported symbol by name.
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the exported symbol.
    pub unsafe fn symbol<T>(&self, name: &str) -> Result<libloading::Symbol<'_, T>, LoadError> {
        let mut cname = Vec::with_capacity(name.len() + 1);
        cname.extend_from_slice(name.as_bytes());
        cname.push(0);
        self.inner.get(&cname).map_err(|err| LoadError::MissingSymbol {
            symbol: name.to_owned(),
            details: err.to_string(),
        })
    }
}

fn open(path: &Path) -> Result<libloading::Library, LoadError> {
    // Paths with a directory component are not searched for, so their
    // absence is reported before the loader is involved
    if path.components().count() > 1 && !path.is_file() {
        error!("Native library {} does not exist", path.display());
        return Err(LoadError::NotFound(path.to_owned()));
    }
    unsafe { libloading::Library::new(path) }.map_err(|err| {
        error!("Unable to open native library {}: {}", path.display(), err);
        LoadError::Open { name: path.display().to_string(), details: err.to_string() }
    })
}

#[cfg(unix)]
fn this_image() -> Result<libloading::Library, LoadError> {
    Ok(libloading::os::unix::Library::this().into())
}

#[cfg(windows)]
fn this_image() -> Result<libloading::Library, LoadError> {
    libloading::os::windows::Library::this()
        .map(libloading::Library::from)
        .map_err(|err| LoadError::Open { name: s!("<executable>"), details: err.to_string() })
}
