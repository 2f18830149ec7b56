#![doc = "Algorithm-agnostic message digest engine for hashpal."]
#![deny(unsafe_op_in_unsafe_fn)]

// Core traits and primitive bindings
pub mod provider;
pub mod registry;

// Contexts and one-shot hashing
pub mod context;
pub mod oneshot;

// C ABI
#[cfg(feature = "ffi")]
pub mod ffi;

pub use context::DigestCtx;
pub use hashpal_types::{CryptoError, HashAlgId};
pub use provider::{Digest, HashAlgorithm, HashPrimitive};
