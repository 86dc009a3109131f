//! The signing identity used to author proposals.

use std::sync::Arc;

use gatewire_api::crypto::{SerializableBytes, Signer};
use gatewire_api::identity::Identity;
use gatewire_proto::ledger::v1::SerializedIdentity;
use gatewire_types::error::{CryptoError, IdentityError};
use prost::Message;

/// A caller-held identity paired with its signing backend.
///
/// The identity supplies the creator descriptor embedded in proposal
/// headers; the signer produces detached signatures over the exact proposal
/// bytes that go on the wire. Signatures are never cached here: each
/// distinct payload is signed independently by the backend.
pub struct SigningIdentity {
    identity: Arc<dyn Identity>,
    signer: Arc<dyn Signer>,
}

impl SigningIdentity {
    /// Pairs an identity with the signer that holds its private key.
    pub fn new(identity: Arc<dyn Identity>, signer: Arc<dyn Signer>) -> Self {
        Self { identity, signer }
    }

    /// Serializes the identity descriptor for embedding in a proposal header.
    pub fn creator(&self) -> Result<Vec<u8>, IdentityError> {
        let credential = self
            .identity
            .credential()
            .map_err(|e| IdentityError::Credential(e.to_string()))?;

        let descriptor = SerializedIdentity {
            provider_id: self.identity.provider_id().to_string(),
            credential,
        };
        Ok(descriptor.encode_to_vec())
    }

    /// Produces a detached signature over the exact byte sequence given.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, IdentityError> {
        self.signer
            .sign(message)
            .map_err(|e| IdentityError::Sign(e.to_string()))
    }
}

/// An identity whose credential is a raw encoded public key.
pub struct KeyIdentity {
    provider_id: String,
    credential: Vec<u8>,
}

impl KeyIdentity {
    /// Creates an identity from a provider name and a serializable public key.
    pub fn new(provider_id: impl Into<String>, public_key: &impl SerializableBytes) -> Self {
        Self {
            provider_id: provider_id.into(),
            credential: public_key.to_bytes(),
        }
    }
}

impl Identity for KeyIdentity {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn credential(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(self.credential.clone())
    }
}
