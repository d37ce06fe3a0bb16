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

//! Typed surface over the C ABI exported by the native library:
//!
//! ```c
//! uint32_t ldk_bridge_abi_version(void);
//! int32_t  ldk_bridge_dispatch(const uint8_t *req, size_t req_len,
//!                              uint8_t **out, size_t *out_len);
//! void     ldk_bridge_free(uint8_t *buf, size_t len);
//! uint8_t  ldk_bridge_thread_safe(void);   /* optional */
//! ```
//!
//! `ldk_bridge_dispatch` takes an encoded request frame and, on zero status,
//! hands out a reply frame allocated by the library, which must be returned
//! to it through `ldk_bridge_free`.

use std::fmt::{self, Debug, Formatter};
use std::ptr;
use std::slice;
use std::sync::Arc;

use crate::constants::{ABI_VERSION, SYM_ABI_VERSION, SYM_DISPATCH, SYM_FREE, SYM_THREAD_SAFE};
use crate::loader::NativeLibrary;
use crate::{DispatchError, LoadError};

pub type AbiVersionFn = unsafe extern "C" fn() -> u32;
pub type DispatchFn = unsafe extern "C" fn(*const u8, usize, *mut *mut u8, *mut usize) -> i32;
pub type FreeFn = unsafe extern "C" fn(*mut u8, usize);
pub type ThreadSafeFn = unsafe extern "C" fn() -> u8;

/// Concurrency contract declared by the native library.
///
/// The bridge neither serializes nor parallelizes calls; callers sharing a
/// binding between threads must respect this contract themselves.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum Concurrency {
    #[display("thread-safe")]
    ThreadSafe,

    #[display("single-threaded")]
    SingleThreaded,

    #[display("undeclared")]
    Undeclared,
}

/// Functions exported by the native library
#[derive(Copy, Clone)]
pub struct EntryPoints {
    pub abi_version: AbiVersionFn,
    pub dispatch: DispatchFn,
    pub free: FreeFn,
    pub thread_safe: Option<ThreadSafeFn>,
}

impl EntryPoints {
    fn lookup(library: &NativeLibrary) -> Result<EntryPoints, LoadError> {
        unsafe {
            Ok(EntryPoints {
                abi_version: *library.symbol::<AbiVersionFn>(SYM_ABI_VERSION)?,
                dispatch: *library.symbol::<DispatchFn>(SYM_DISPATCH)?,
                free: *library.symbol::<FreeFn>(SYM_FREE)?,
                thread_safe: library.symbol::<ThreadSafeFn>(SYM_THREAD_SAFE).ok().map(|sym| *sym),
            })
        }
    }
}

/// Binding to the native library. Cloning shares the same library handle.
#[derive(Clone)]
pub struct Binding {
    library: Arc<NativeLibrary>,
    entry_points: EntryPoints,
    abi_version: u32,
    concurrency: Concurrency,
}

impl Debug for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("strategy", self.library.strategy())
            .field("abi_version", &self.abi_version)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Binding {
    /// Resolves the exported functions and checks the ABI version.
    pub fn new(library: Arc<NativeLibrary>) -> Result<Binding, LoadError> {
        let entry_points = EntryPoints::lookup(&library)?;
        unsafe { Binding::with_entry_points(library, entry_points) }
    }

    /// Binds to already resolved entry points.
    ///
    /// # Safety
    ///
    /// The functions must follow the native library C ABI contract and stay
    /// valid for as long as `library` is alive.
    pub unsafe fn with_entry_points(
        library: Arc<NativeLibrary>,
        entry_points: EntryPoints,
    ) -> Result<Binding, LoadError> {
        let abi_version = (entry_points.abi_version)();
        if abi_version != ABI_VERSION {
            error!("Native library ABI version {} is not supported", abi_version);
            return Err(LoadError::AbiMismatch { expected: ABI_VERSION, found: abi_version });
        }

        let concurrency = match entry_points.thread_safe {
            Some(thread_safe) if thread_safe() != 0 => Concurrency::ThreadSafe,
            Some(_) => Concurrency::SingleThreaded,
            None => Concurrency::Undeclared,
        };
        if concurrency != Concurrency::ThreadSafe {
            warn!(
                "Native library concurrency contract is {}; concurrent calls must be serialized \
                 by the caller",
                concurrency
            );
        }

        debug!("Bound native library ABI v{} ({})", abi_version, concurrency);
        Ok(Binding { library, entry_points, abi_version, concurrency })
    }

    pub fn library(&self) -> &NativeLibrary { &self.library }

    pub fn abi_version(&self) -> u32 { self.abi_version }

    pub fn concurrency(&self) -> Concurrency { self.concurrency }

    /// Performs one synchronous native call with an encoded request frame,
    /// returning the encoded reply frame. `method` is used for diagnostics
    /// only.
    pub fn call(&self, method: &str, request: &[u8]) -> Result<Vec<u8>, DispatchError> {
        let mut out: *mut u8 = ptr::null_mut();
        let mut out_len: usize = 0;

        trace!("Native call `{}` with {} byte request", method, request.len());
        let status = unsafe {
            (self.entry_points.dispatch)(request.as_ptr(), request.len(), &mut out, &mut out_len)
        };

        if status != 0 {
            if !out.is_null() {
                unsafe { (self.entry_points.free)(out, out_len) };
            }
            error!("Native call `{}` faulted with status {}", method, status);
            return Err(DispatchError::Fault { method: method.to_owned(), status });
        }
        if out.is_null() {
            return Err(DispatchError::NoReply(method.to_owned()));
        }

        let reply = unsafe { slice::from_raw_parts(out, out_len) }.to_vec();
        unsafe { (self.entry_points.free)(out, out_len) };
        Ok(reply)
    }
}
