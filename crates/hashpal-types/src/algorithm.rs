use core::fmt;
use core::str::FromStr;

use crate::CryptoError;

/// Hash algorithm identifiers.
///
/// The set is closed: every value names an algorithm the digest engine can
/// instantiate. Raw selectors from outside Rust are checked with
/// [`HashAlgId::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgId {
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgId {
    /// All supported algorithms, in selector order.
    pub const ALL: [HashAlgId; 5] = [
        HashAlgId::Md5,
        HashAlgId::Sha1,
        HashAlgId::Sha256,
        HashAlgId::Sha384,
        HashAlgId::Sha512,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            HashAlgId::Md5 => "MD5",
            HashAlgId::Sha1 => "SHA1",
            HashAlgId::Sha256 => "SHA256",
            HashAlgId::Sha384 => "SHA384",
            HashAlgId::Sha512 => "SHA512",
        }
    }

    /// Raw selector value used at the C boundary.
    pub fn as_raw(self) -> i32 {
        match self {
            HashAlgId::Md5 => 1,
            HashAlgId::Sha1 => 2,
            HashAlgId::Sha256 => 3,
            HashAlgId::Sha384 => 4,
            HashAlgId::Sha512 => 5,
        }
    }
}

impl TryFrom<i32> for HashAlgId {
    type Error = CryptoError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(HashAlgId::Md5),
            2 => Ok(HashAlgId::Sha1),
            3 => Ok(HashAlgId::Sha256),
            4 => Ok(HashAlgId::Sha384),
            5 => Ok(HashAlgId::Sha512),
            _ => Err(CryptoError::InvalidAlgId),
        }
    }
}

impl fmt::Display for HashAlgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgId {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgId::Md5),
            "sha1" | "sha-1" => Ok(HashAlgId::Sha1),
            "sha256" | "sha-256" => Ok(HashAlgId::Sha256),
            "sha384" | "sha-384" => Ok(HashAlgId::Sha384),
            "sha512" | "sha-512" => Ok(HashAlgId::Sha512),
            _ => Err(CryptoError::InvalidAlgId),
        }
    }
}
