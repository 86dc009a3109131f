//! Defines unified traits for cryptographic signing primitives.

use crate::error::CryptoError;

/// A trait for any cryptographic object that can be serialized to and from bytes.
pub trait SerializableBytes {
    /// Converts the object to a byte vector.
    fn to_bytes(&self) -> Vec<u8>;

    /// Creates an object from a byte slice.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError>
    where
        Self: Sized;
}

/// A trait for a key pair used in a signature algorithm.
pub trait SigningKeyPair {
    /// The public key type used for verification.
    type PublicKey: VerifyingKey<Signature = Self::Signature>;
    /// The private key type used for signing.
    type PrivateKey: SigningKey<Signature = Self::Signature>;
    /// The signature type produced.
    type Signature: Signature;

    /// Gets the public key.
    fn public_key(&self) -> Self::PublicKey;
    /// Gets the private key.
    fn private_key(&self) -> Self::PrivateKey;
    /// Signs a message with the private key.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A trait for a public key used for signature verification.
pub trait VerifyingKey: SerializableBytes {
    /// The signature type that this key can verify.
    type Signature: Signature;
    /// Verifies a signature against a message.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> Result<(), CryptoError>;
}

/// A trait for a private key used for signing operations.
pub trait SigningKey: SerializableBytes {
    /// The signature type that this key produces.
    type Signature: Signature;
    /// Signs a message.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A marker trait for a cryptographic signature.
pub trait Signature: SerializableBytes {}

/// An object-safe signing seam for callers that hold an opaque key.
///
/// The signature is detached and computed over the exact byte sequence given;
/// implementations must not hash, re-serialize, or otherwise transform the
/// message before signing.
pub trait Signer: Send + Sync {
    /// Signs the message, returning the detached signature bytes.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

impl<K> Signer for K
where
    K: SigningKey + Send + Sync,
{
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        SigningKey::sign(self, message).map(|s| s.to_bytes())
    }
}
