//! Static table of the supported digest algorithms.

use hashpal_types::{CryptoError, HashAlgId};

use crate::context::WorkingState;
use crate::provider::HashPrimitive;

/// Largest digest produced by any registered algorithm.
pub const MAX_OUTPUT_SIZE: usize = 64;

/// Registry entry binding an algorithm id to its sizes and primitives.
pub struct AlgorithmEntry {
    /// Algorithm identifier.
    pub id: HashAlgId,
    /// Digest length in bytes.
    pub output_size: usize,
    /// Internal block length in bytes.
    pub block_size: usize,
    pub(crate) init: fn() -> WorkingState,
    pub(crate) oneshot: fn(&[u8], &mut [u8]) -> Result<(), CryptoError>,
}

impl AlgorithmEntry {
    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        self.id.name()
    }
}

fn init_state<P>() -> WorkingState
where
    P: HashPrimitive,
    WorkingState: From<P>,
{
    WorkingState::from(P::init())
}

macro_rules! entry {
    ($id:expr, $ty:ty) => {
        AlgorithmEntry {
            id: $id,
            output_size: <$ty as HashPrimitive>::OUTPUT_SIZE,
            block_size: <$ty as HashPrimitive>::BLOCK_SIZE,
            init: init_state::<$ty>,
            oneshot: <$ty as HashPrimitive>::oneshot,
        }
    };
}

static MD5: AlgorithmEntry = entry!(HashAlgId::Md5, md5::Md5);
static SHA1: AlgorithmEntry = entry!(HashAlgId::Sha1, sha1::Sha1);
static SHA256: AlgorithmEntry = entry!(HashAlgId::Sha256, sha2::Sha256);
static SHA384: AlgorithmEntry = entry!(HashAlgId::Sha384, sha2::Sha384);
static SHA512: AlgorithmEntry = entry!(HashAlgId::Sha512, sha2::Sha512);

/// Look up the registry entry for `id`.
pub fn lookup(id: HashAlgId) -> &'static AlgorithmEntry {
    match id {
        HashAlgId::Md5 => &MD5,
        HashAlgId::Sha1 => &SHA1,
        HashAlgId::Sha256 => &SHA256,
        HashAlgId::Sha384 => &SHA384,
        HashAlgId::Sha512 => &SHA512,
    }
}

/// Digest length in bytes for `id`.
pub fn output_size(id: HashAlgId) -> usize {
    lookup(id).output_size
}

/// Every registered algorithm, in selector order.
pub fn entries() -> impl Iterator<Item = &'static AlgorithmEntry> {
    HashAlgId::ALL.into_iter().map(lookup)
}
