//! Trait-based provider mechanism for digest algorithms.
//!
//! [`HashPrimitive`] is the contract with the underlying hash library: one
//! implementation per algorithm, bound statically to the RustCrypto hashers.
//! [`Digest`] and [`HashAlgorithm`] are the object-safe interfaces callers
//! use when the algorithm is only known at run time.

use hashpal_types::CryptoError;

/// A raw hash primitive with a fixed output size.
///
/// `init` must run before the first `update`/`finish` on a state, `update`
/// may run any number of times, and `finish` leaves the state consumed:
/// callers re-`init` before reusing it.
pub trait HashPrimitive: Clone + Send + Sync + 'static {
    /// The output size in bytes.
    const OUTPUT_SIZE: usize;

    /// The internal block size in bytes.
    const BLOCK_SIZE: usize;

    /// Create a state for the empty message.
    fn init() -> Self;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize and write exactly `OUTPUT_SIZE` bytes to the front of `out`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// One-shot hash computation without a persistent state.
    fn oneshot(data: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
        let mut state = Self::init();
        state.update(data)?;
        state.finish(out)
    }
}

macro_rules! rustcrypto_primitive {
    ($ty:ty, $output:expr, $block:expr) => {
        impl HashPrimitive for $ty {
            const OUTPUT_SIZE: usize = $output;
            const BLOCK_SIZE: usize = $block;

            fn init() -> Self {
                <$ty as digest::Digest>::new()
            }

            fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
                digest::Digest::update(self, data);
                Ok(())
            }

            fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
                if out.len() < $output {
                    return Err(CryptoError::BufferTooSmall {
                        need: $output,
                        got: out.len(),
                    });
                }
                let out = digest::Output::<$ty>::from_mut_slice(&mut out[..$output]);
                digest::Digest::finalize_into_reset(self, out);
                Ok(())
            }

            fn oneshot(data: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
                if out.len() < $output {
                    return Err(CryptoError::BufferTooSmall {
                        need: $output,
                        got: out.len(),
                    });
                }
                let hash = <$ty as digest::Digest>::digest(data);
                out[..$output].copy_from_slice(&hash);
                Ok(())
            }
        }
    };
}

rustcrypto_primitive!(md5::Md5, 16, 64);
rustcrypto_primitive!(sha1::Sha1, 20, 64);
rustcrypto_primitive!(sha2::Sha256, 32, 64);
rustcrypto_primitive!(sha2::Sha384, 48, 128);
rustcrypto_primitive!(sha2::Sha512, 64, 128);

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// The internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash and write the digest to `out`.
    /// The length of `out` must be at least `output_size()`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);
}

/// A convenience wrapper trait for creating digest instances.
pub trait HashAlgorithm: Send + Sync {
    /// Create a new digest context.
    fn new_digest(&self) -> Box<dyn Digest>;

    /// One-shot hash computation.
    fn hash(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = self.new_digest();
        ctx.update(data)?;
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out)?;
        Ok(out)
    }
}
