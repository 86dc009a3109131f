//! Defines the `Identity` boundary for caller-held identities.

use crate::error::CryptoError;

/// A caller-held ledger identity.
///
/// An identity names the membership provider that issued it and can produce
/// the credential bytes (an encoded public key or certificate) that other
/// parties use to verify signatures attributed to it.
pub trait Identity: Send + Sync {
    /// The identifier of the membership provider that issued this identity.
    fn provider_id(&self) -> &str;

    /// The serialized credential material for this identity.
    ///
    /// Fails if the underlying credential cannot be serialized, e.g. on
    /// malformed certificate material.
    fn credential(&self) -> Result<Vec<u8>, CryptoError>;
}
