//! Stateless single-buffer digests.
//!
//! These run the primitive's one-shot path directly; no [`DigestCtx`] is
//! built. All functions are reentrant.
//!
//! [`DigestCtx`]: crate::DigestCtx

use hashpal_types::{CryptoError, HashAlgId};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::registry::{self, MAX_OUTPUT_SIZE};

/// Hash `data` with `alg`, writing the digest to the front of `out`.
///
/// Returns the digest length. An empty `out` is rejected with
/// [`CryptoError::InvalidArg`]; a non-empty `out` that is too short is
/// rejected with [`CryptoError::BufferTooSmall`], whose `need` field is the
/// length to retry with. Nothing is written on failure.
pub fn digest_into(alg: HashAlgId, data: &[u8], out: &mut [u8]) -> Result<usize, CryptoError> {
    if out.is_empty() {
        return Err(CryptoError::InvalidArg);
    }
    let entry = registry::lookup(alg);
    let need = entry.output_size;
    if out.len() < need {
        return Err(CryptoError::BufferTooSmall {
            need,
            got: out.len(),
        });
    }
    (entry.oneshot)(data, &mut out[..need])?;
    Ok(need)
}

/// Hash `data` with `alg` and return the digest.
pub fn digest(alg: HashAlgId, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut out = vec![0u8; registry::output_size(alg)];
    digest_into(alg, data, &mut out)?;
    Ok(out)
}

/// Check in constant time whether `expected` is the `alg` digest of `data`.
pub fn verify(alg: HashAlgId, data: &[u8], expected: &[u8]) -> Result<bool, CryptoError> {
    let mut actual = [0u8; MAX_OUTPUT_SIZE];
    let n = digest_into(alg, data, &mut actual)?;
    let matched = expected.len() == n && bool::from(actual[..n].ct_eq(expected));
    actual.zeroize();
    Ok(matched)
}
