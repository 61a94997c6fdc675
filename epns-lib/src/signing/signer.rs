//! Signer capability.
//!
//! The SDK never touches private keys. Callers hand in anything that can
//! produce an EIP-712 signature: a wallet bridge, a remote key service, or a
//! signature obtained out of band.

use async_trait::async_trait;

use super::{DomainDescriptor, Signature, SubscriptionMessage, TypeSchema};
use crate::Result;

/// Signer trait for EIP-712 typed data.
///
/// Implement this trait to plug a wallet or key-management component into
/// [`ChannelClient::opt_in`](crate::ChannelClient::opt_in) and
/// [`ChannelClient::opt_out`](crate::ChannelClient::opt_out).
#[async_trait]
pub trait TypedDataSigner: Send + Sync {
    /// Sign `message` under `domain` using the struct definitions in `types`.
    ///
    /// Failures should be reported as [`EpnsError::Signer`](crate::EpnsError::Signer).
    async fn sign_typed_data(
        &self,
        domain: &DomainDescriptor,
        types: &TypeSchema,
        message: &SubscriptionMessage,
    ) -> Result<Signature>;
}

#[async_trait]
impl<T: TypedDataSigner + ?Sized> TypedDataSigner for std::sync::Arc<T> {
    async fn sign_typed_data(
        &self,
        domain: &DomainDescriptor,
        types: &TypeSchema,
        message: &SubscriptionMessage,
    ) -> Result<Signature> {
        (**self).sign_typed_data(domain, types, message).await
    }
}

/// Signer returning a signature produced elsewhere.
///
/// Useful when the typed data was exported (see
/// [`TypedData`](super::TypedData)) and signed by a hardware wallet or
/// another process.
#[derive(Clone, Debug)]
pub struct PresignedSigner {
    signature: Signature,
}

impl PresignedSigner {
    /// Wrap an existing signature.
    pub fn new(signature: impl Into<Signature>) -> Self {
        Self {
            signature: signature.into(),
        }
    }
}

#[async_trait]
impl TypedDataSigner for PresignedSigner {
    async fn sign_typed_data(
        &self,
        _domain: &DomainDescriptor,
        _types: &TypeSchema,
        _message: &SubscriptionMessage,
    ) -> Result<Signature> {
        Ok(self.signature.clone())
    }
}
