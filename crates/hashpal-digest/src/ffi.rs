//! Handle-based C ABI.
//!
//! Contexts cross the boundary as opaque `*mut DigestCtx` pointers owned by
//! the caller between `hashpal_digest_create` and `hashpal_digest_free`.
//! Functions return `1` on success and `-1` on failure. Lengths are `i32`;
//! negative lengths are rejected.

use std::alloc::{self, Layout};
use std::ptr;
use std::slice;

use hashpal_types::{CryptoError, HashAlgId};

use crate::context::DigestCtx;
use crate::oneshot;

const OK: i32 = 1;
const FAIL: i32 = -1;

fn status<T>(result: Result<T, CryptoError>) -> i32 {
    match result {
        Ok(_) => OK,
        Err(_) => FAIL,
    }
}

/// Move `ctx` to the heap, reporting allocation failure instead of aborting.
fn try_box(ctx: DigestCtx) -> Result<Box<DigestCtx>, CryptoError> {
    let layout = Layout::new::<DigestCtx>();
    debug_assert!(layout.size() != 0);
    // SAFETY: `layout` has non-zero size.
    let raw = unsafe { alloc::alloc(layout) }.cast::<DigestCtx>();
    if raw.is_null() {
        return Err(CryptoError::MemAllocFail);
    }
    // SAFETY: `raw` was allocated by the global allocator with the layout of
    // `DigestCtx`, which is what `Box` expects when it frees it.
    unsafe {
        raw.write(ctx);
        Ok(Box::from_raw(raw))
    }
}

/// Create a digest context for the raw algorithm selector `algorithm`.
///
/// Writes the digest length to `*pcb_digest` and returns the new handle.
/// Returns null if `pcb_digest` is null, allocation fails, or `algorithm` is
/// unknown; in the last case `*pcb_digest` is set to `-1`.
///
/// # Safety
///
/// `pcb_digest` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_create(
    algorithm: i32,
    pcb_digest: *mut i32,
) -> *mut DigestCtx {
    if pcb_digest.is_null() {
        return ptr::null_mut();
    }
    let alg = match HashAlgId::try_from(algorithm) {
        Ok(alg) => alg,
        Err(_) => {
            // SAFETY: checked non-null; caller guarantees validity.
            unsafe { *pcb_digest = -1 };
            return ptr::null_mut();
        }
    };
    match try_box(DigestCtx::new(alg)) {
        Ok(ctx) => {
            // SAFETY: as above.
            unsafe { *pcb_digest = ctx.digest_size() as i32 };
            Box::into_raw(ctx)
        }
        Err(_) => ptr::null_mut(),
    }
}

/// Release a context. A null handle is ignored.
///
/// # Safety
///
/// `ctx` must be null or a live handle from `hashpal_digest_create`; it must
/// not be used again afterwards.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_free(ctx: *mut DigestCtx) {
    if !ctx.is_null() {
        // SAFETY: caller transfers ownership of a handle created by `try_box`.
        drop(unsafe { Box::from_raw(ctx) });
    }
}

/// Append `cb_buf` bytes at `buf` to the message.
///
/// A zero length always succeeds, whatever `ctx` and `buf` are.
///
/// # Safety
///
/// When `cb_buf > 0`, `ctx` must be null or a live handle and `buf` must be
/// null or valid for `cb_buf` bytes of reads.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_update(
    ctx: *mut DigestCtx,
    buf: *const u8,
    cb_buf: i32,
) -> i32 {
    if cb_buf == 0 {
        return OK;
    }
    if ctx.is_null() || buf.is_null() || cb_buf < 0 {
        return FAIL;
    }
    // SAFETY: non-null pointers; caller guarantees validity and exclusivity.
    let (ctx, data) = unsafe { (&mut *ctx, slice::from_raw_parts(buf, cb_buf as usize)) };
    status(ctx.update(data))
}

/// Write the digest to `output` and rearm the context.
///
/// Fails if `cb_output` is smaller than the digest length.
///
/// # Safety
///
/// `ctx` must be null or a live handle; `output` must be null or valid for
/// `cb_output` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_final(
    ctx: *mut DigestCtx,
    output: *mut u8,
    cb_output: i32,
) -> i32 {
    if ctx.is_null() || output.is_null() || cb_output < 0 {
        return FAIL;
    }
    // SAFETY: as documented above.
    let (ctx, out) =
        unsafe { (&mut *ctx, slice::from_raw_parts_mut(output, cb_output as usize)) };
    status(ctx.finish(out))
}

/// Write the digest of the input so far without disturbing the context.
///
/// # Safety
///
/// Same as [`hashpal_digest_final`], except that `ctx` is only read.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_current(
    ctx: *const DigestCtx,
    output: *mut u8,
    cb_output: i32,
) -> i32 {
    if ctx.is_null() || output.is_null() || cb_output < 0 {
        return FAIL;
    }
    // SAFETY: as documented above.
    let (ctx, out) = unsafe { (&*ctx, slice::from_raw_parts_mut(output, cb_output as usize)) };
    status(ctx.current(out))
}

/// Discard all input and return the context to the empty-message state.
///
/// # Safety
///
/// `ctx` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_reset(ctx: *mut DigestCtx) -> i32 {
    if ctx.is_null() {
        return FAIL;
    }
    // SAFETY: non-null; caller guarantees validity and exclusivity.
    unsafe { (*ctx).reset() };
    OK
}

/// Hash `cb_buf` bytes at `buf` in one pass.
///
/// Once the algorithm is recognized the digest length is written to
/// `*pcb_digest`, even if `cb_output` then turns out to be too small.
///
/// # Safety
///
/// `buf` must be valid for `cb_buf` bytes of reads (it may be null when
/// `cb_buf` is zero), `output` must be null or valid for `cb_output` bytes
/// of writes, and `pcb_digest` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn hashpal_digest_one_shot(
    algorithm: i32,
    buf: *const u8,
    cb_buf: i32,
    output: *mut u8,
    cb_output: i32,
    pcb_digest: *mut i32,
) -> i32 {
    if output.is_null() || cb_output <= 0 || pcb_digest.is_null() {
        return FAIL;
    }
    let Ok(alg) = HashAlgId::try_from(algorithm) else {
        return FAIL;
    };
    let need = crate::registry::output_size(alg);
    // SAFETY: checked non-null; caller guarantees validity.
    unsafe { *pcb_digest = need as i32 };
    if (cb_output as usize) < need {
        return FAIL;
    }
    let data: &[u8] = match cb_buf {
        0 => &[],
        n if n < 0 || buf.is_null() => return FAIL,
        // SAFETY: non-null; caller guarantees `n` readable bytes.
        n => unsafe { slice::from_raw_parts(buf, n as usize) },
    };
    // SAFETY: non-null; caller guarantees `cb_output` writable bytes.
    let out = unsafe { slice::from_raw_parts_mut(output, cb_output as usize) };
    status(oneshot::digest_into(alg, data, out))
}
