//! Algorithm-agnostic digest context.
//!
//! A [`DigestCtx`] wraps exactly one algorithm's working state behind a
//! single type. The algorithm is fixed at construction. Finishing a context
//! writes the digest and rearms it for a new message; [`DigestCtx::current`]
//! reports the digest so far without touching the accumulated input.

use std::fmt;
use std::io;

use hashpal_types::{CryptoError, HashAlgId};
use log::trace;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::provider::{Digest, HashAlgorithm, HashPrimitive};
use crate::registry::{self, MAX_OUTPUT_SIZE};

/// Working state of one algorithm.
#[derive(Clone)]
pub(crate) enum WorkingState {
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

macro_rules! with_state {
    ($state:expr, $p:ident => $body:expr) => {
        match $state {
            WorkingState::Md5($p) => $body,
            WorkingState::Sha1($p) => $body,
            WorkingState::Sha256($p) => $body,
            WorkingState::Sha384($p) => $body,
            WorkingState::Sha512($p) => $body,
        }
    };
}

macro_rules! state_from {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for WorkingState {
            fn from(state: $ty) -> Self {
                WorkingState::$variant(state)
            }
        }
    };
}

state_from!(Md5, md5::Md5);
state_from!(Sha1, sha1::Sha1);
state_from!(Sha256, sha2::Sha256);
state_from!(Sha384, sha2::Sha384);
state_from!(Sha512, sha2::Sha512);

impl WorkingState {
    pub(crate) fn algorithm(&self) -> HashAlgId {
        match self {
            WorkingState::Md5(_) => HashAlgId::Md5,
            WorkingState::Sha1(_) => HashAlgId::Sha1,
            WorkingState::Sha256(_) => HashAlgId::Sha256,
            WorkingState::Sha384(_) => HashAlgId::Sha384,
            WorkingState::Sha512(_) => HashAlgId::Sha512,
        }
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        with_state!(self, p => HashPrimitive::update(p, data))
    }

    fn finish_and_rearm(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        with_state!(self, p => finish_and_rearm(p, out))
    }
}

/// Finalize `state` into `out` and reinitialize it.
///
/// The digest is captured in a scratch buffer first, so a primitive failure
/// leaves `out` untouched and `state` not rearmed.
fn finish_and_rearm<P: HashPrimitive>(state: &mut P, out: &mut [u8]) -> Result<(), CryptoError> {
    let n = P::OUTPUT_SIZE;
    let mut scratch = [0u8; MAX_OUTPUT_SIZE];
    let result = state.finish(&mut scratch[..n]);
    if result.is_ok() {
        out[..n].copy_from_slice(&scratch[..n]);
        *state = P::init();
    }
    scratch.zeroize();
    result
}

/// Message digest context for one of the supported algorithms.
#[derive(Clone)]
pub struct DigestCtx {
    alg: HashAlgId,
    digest_size: usize,
    state: WorkingState,
}

impl DigestCtx {
    /// Create a context in the empty-message state.
    pub fn new(alg: HashAlgId) -> Self {
        let entry = registry::lookup(alg);
        trace!("digest context created for {alg}");
        Self {
            alg,
            digest_size: entry.output_size,
            state: (entry.init)(),
        }
    }

    /// Create a context from a raw selector, returning it with its digest length.
    ///
    /// Unknown selectors are rejected before anything is constructed.
    pub fn from_raw_id(raw: i32) -> Result<(Self, usize), CryptoError> {
        let alg = HashAlgId::try_from(raw)?;
        let ctx = Self::new(alg);
        let digest_size = ctx.digest_size;
        Ok((ctx, digest_size))
    }

    /// The algorithm this context was created for.
    pub fn algorithm(&self) -> HashAlgId {
        self.alg
    }

    /// Digest length in bytes.
    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// Internal block length in bytes.
    pub fn block_size(&self) -> usize {
        registry::lookup(self.alg).block_size
    }

    /// Append `data` to the message. An empty slice is a no-op.
    pub fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        if data.is_empty() {
            return Ok(());
        }
        self.state.update(data)
    }

    /// Write the digest of everything fed so far into `out` and rearm.
    ///
    /// Returns the number of bytes written. `out` must hold at least
    /// [`digest_size`](Self::digest_size) bytes; otherwise nothing is written
    /// and the required length is reported in [`CryptoError::BufferTooSmall`].
    /// On a primitive failure the context is left unusable and should be
    /// dropped.
    pub fn finish(&mut self, out: &mut [u8]) -> Result<usize, CryptoError> {
        self.check_output(out)?;
        self.state.finish_and_rearm(out)?;
        trace!("digest context rearmed for {}", self.alg);
        Ok(self.digest_size)
    }

    /// Like [`finish`](Self::finish), returning the digest as a vector.
    pub fn finish_vec(&mut self) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![0u8; self.digest_size];
        self.finish(&mut out)?;
        Ok(out)
    }

    /// Write the digest of everything fed so far without disturbing the context.
    ///
    /// Finishes a duplicate; this context keeps accumulating.
    /// Errors are those of [`finish`](Self::finish) on the duplicate.
    pub fn current(&self, out: &mut [u8]) -> Result<usize, CryptoError> {
        self.check_output(out)?;
        let mut dup = self.clone();
        dup.finish(out)
    }

    /// Compare the current digest with `expected` in constant time.
    pub fn verify(&self, expected: &[u8]) -> Result<bool, CryptoError> {
        let mut actual = [0u8; MAX_OUTPUT_SIZE];
        let n = self.current(&mut actual)?;
        let matched = expected.len() == n && bool::from(actual[..n].ct_eq(expected));
        actual.zeroize();
        Ok(matched)
    }

    /// Discard all input and return to the empty-message state.
    pub fn reset(&mut self) {
        self.state = (registry::lookup(self.alg).init)();
        debug_assert_eq!(self.state.algorithm(), self.alg);
    }

    fn check_output(&self, out: &[u8]) -> Result<(), CryptoError> {
        if out.len() < self.digest_size {
            return Err(CryptoError::BufferTooSmall {
                need: self.digest_size,
                got: out.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for DigestCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestCtx")
            .field("alg", &self.alg)
            .field("digest_size", &self.digest_size)
            .finish_non_exhaustive()
    }
}

impl Digest for DigestCtx {
    fn output_size(&self) -> usize {
        self.digest_size
    }

    fn block_size(&self) -> usize {
        DigestCtx::block_size(self)
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        DigestCtx::update(self, data)
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        DigestCtx::finish(self, out).map(|_| ())
    }

    fn reset(&mut self) {
        DigestCtx::reset(self)
    }
}

impl HashAlgorithm for HashAlgId {
    fn new_digest(&self) -> Box<dyn Digest> {
        Box::new(DigestCtx::new(*self))
    }

    fn hash(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        crate::oneshot::digest(*self, data)
    }
}

impl io::Write for DigestCtx {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        DigestCtx::update(self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const SHA256_ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    /// Primitive whose digest is the first four bytes fed, and whose finish
    /// can be told to fail.
    #[derive(Clone, Default)]
    struct Scripted {
        fed: Vec<u8>,
        fail_finish: bool,
    }

    impl HashPrimitive for Scripted {
        const OUTPUT_SIZE: usize = 4;
        const BLOCK_SIZE: usize = 4;

        fn init() -> Self {
            Self::default()
        }

        fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
            self.fed.extend_from_slice(data);
            Ok(())
        }

        fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
            if self.fail_finish {
                // Scribble on the scratch buffer to prove it never leaks out.
                out[..4].fill(0xEE);
                return Err(CryptoError::PrimitiveFail);
            }
            let mut digest = [0u8; 4];
            for (d, s) in digest.iter_mut().zip(&self.fed) {
                *d = *s;
            }
            out[..4].copy_from_slice(&digest);
            Ok(())
        }
    }

    #[test]
    fn test_finish_and_rearm_success() {
        let mut state = Scripted::init();
        state.update(b"wxyz-tail").unwrap();
        let mut out = [0u8; 4];
        finish_and_rearm(&mut state, &mut out).unwrap();
        assert_eq!(&out, b"wxyz");
        assert!(state.fed.is_empty());
    }

    #[test]
    fn test_finish_and_rearm_primitive_failure() {
        let mut state = Scripted {
            fed: b"keep".to_vec(),
            fail_finish: true,
        };
        let mut out = [0x11u8; 4];
        assert_eq!(
            finish_and_rearm(&mut state, &mut out),
            Err(CryptoError::PrimitiveFail)
        );
        assert_eq!(out, [0x11; 4]);
        assert_eq!(state.fed, b"keep");
        assert!(state.fail_finish);
    }

    #[test]
    fn test_new_reports_digest_size() {
        for (alg, size) in [
            (HashAlgId::Md5, 16),
            (HashAlgId::Sha1, 20),
            (HashAlgId::Sha256, 32),
            (HashAlgId::Sha384, 48),
            (HashAlgId::Sha512, 64),
        ] {
            let ctx = DigestCtx::new(alg);
            assert_eq!(ctx.algorithm(), alg);
            assert_eq!(ctx.digest_size(), size);
        }
    }

    #[test]
    fn test_from_raw_id() {
        let (ctx, len) = DigestCtx::from_raw_id(3).unwrap();
        assert_eq!(ctx.algorithm(), HashAlgId::Sha256);
        assert_eq!(len, 32);
        assert_eq!(
            DigestCtx::from_raw_id(0).unwrap_err(),
            CryptoError::InvalidAlgId
        );
        assert_eq!(
            DigestCtx::from_raw_id(99).unwrap_err(),
            CryptoError::InvalidAlgId
        );
    }

    #[test]
    fn test_sha256_abc_incremental() {
        let mut ctx = DigestCtx::new(HashAlgId::Sha256);
        ctx.update(b"a").unwrap();
        ctx.update(b"").unwrap();
        ctx.update(b"bc").unwrap();
        let mut out = [0u8; 32];
        assert_eq!(ctx.finish(&mut out).unwrap(), 32);
        assert_eq!(hex(&out), SHA256_ABC);
    }

    #[test]
    fn test_finish_rearms() {
        let mut ctx = DigestCtx::new(HashAlgId::Sha256);
        ctx.update(b"abc").unwrap();
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_ABC);
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_EMPTY);
        ctx.update(b"abc").unwrap();
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_ABC);
    }

    #[test]
    fn test_finish_short_buffer() {
        let mut ctx = DigestCtx::new(HashAlgId::Sha384);
        ctx.update(b"abc").unwrap();
        let mut out = [0x5Au8; 47];
        assert_eq!(
            ctx.finish(&mut out),
            Err(CryptoError::BufferTooSmall { need: 48, got: 47 })
        );
        assert!(out.iter().all(|&b| b == 0x5A));

        // The failed call did not consume the input.
        let mut big = [0u8; 48];
        ctx.finish(&mut big).unwrap();
        assert_eq!(big.to_vec(), crate::oneshot::digest(HashAlgId::Sha384, b"abc").unwrap());
    }

    #[test]
    fn test_finish_larger_buffer_writes_prefix() {
        let mut ctx = DigestCtx::new(HashAlgId::Md5);
        let mut out = [0xFFu8; 64];
        assert_eq!(ctx.finish(&mut out).unwrap(), 16);
        assert_eq!(hex(&out[..16]), "d41d8cd98f00b204e9800998ecf8427e");
        assert!(out[16..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_current_does_not_disturb() {
        let mut ctx = DigestCtx::new(HashAlgId::Sha256);
        ctx.update(b"ab").unwrap();
        let mut snap = [0u8; 32];
        ctx.current(&mut snap).unwrap();
        assert_eq!(snap.to_vec(), crate::oneshot::digest(HashAlgId::Sha256, b"ab").unwrap());
        ctx.current(&mut snap).unwrap();
        assert_eq!(snap.to_vec(), crate::oneshot::digest(HashAlgId::Sha256, b"ab").unwrap());

        ctx.update(b"c").unwrap();
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_ABC);
    }

    #[test]
    fn test_current_short_buffer() {
        let ctx = DigestCtx::new(HashAlgId::Sha1);
        let mut out = [0u8; 10];
        assert_eq!(
            ctx.current(&mut out),
            Err(CryptoError::BufferTooSmall { need: 20, got: 10 })
        );
        assert_eq!(out, [0u8; 10]);
    }

    #[test]
    fn test_reset_discards_input() {
        let mut ctx = DigestCtx::new(HashAlgId::Sha256);
        ctx.update(b"some accumulated input").unwrap();
        ctx.reset();
        assert_eq!(ctx.algorithm(), HashAlgId::Sha256);
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_EMPTY);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = DigestCtx::new(HashAlgId::Sha512);
        a.update(b"shared").unwrap();
        let mut b = a.clone();
        b.update(b" more").unwrap();
        assert_ne!(a.finish_vec().unwrap(), b.finish_vec().unwrap());
    }

    #[test]
    fn test_verify() {
        let mut ctx = DigestCtx::new(HashAlgId::Md5);
        ctx.update(b"abc").unwrap();
        let expected = crate::oneshot::digest(HashAlgId::Md5, b"abc").unwrap();
        assert!(ctx.verify(&expected).unwrap());
        assert!(!ctx.verify(&expected[..15]).unwrap());
        let mut wrong = expected.clone();
        wrong[0] ^= 1;
        assert!(!ctx.verify(&wrong).unwrap());
        // verify is a snapshot: the context still holds "abc".
        assert_eq!(ctx.finish_vec().unwrap(), expected);
    }

    #[test]
    fn test_dyn_digest() {
        let mut d: Box<dyn Digest> = HashAlgId::Sha256.new_digest();
        assert_eq!(d.output_size(), 32);
        assert_eq!(d.block_size(), 64);
        d.update(b"xyz").unwrap();
        d.reset();
        d.update(b"abc").unwrap();
        let mut out = [0u8; 32];
        d.finish(&mut out).unwrap();
        assert_eq!(hex(&out), SHA256_ABC);
        assert_eq!(hex(&HashAlgId::Sha256.hash(b"abc").unwrap()), SHA256_ABC);
    }

    #[test]
    fn test_io_write() {
        use std::io::Write;

        let mut ctx = DigestCtx::new(HashAlgId::Sha256);
        let mut reader: &[u8] = b"abc";
        std::io::copy(&mut reader, &mut ctx).unwrap();
        ctx.flush().unwrap();
        assert_eq!(hex(&ctx.finish_vec().unwrap()), SHA256_ABC);
    }

    #[test]
    fn test_debug_hides_state() {
        let ctx = DigestCtx::new(HashAlgId::Sha1);
        let s = format!("{ctx:?}");
        assert!(s.contains("Sha1"));
        assert!(s.contains("digest_size: 20"));
    }
}
