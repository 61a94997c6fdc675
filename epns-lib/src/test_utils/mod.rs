//! Test utilities for EPNS.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use epns_lib::test_utils::MockSigner;
//!
//! let signer = MockSigner::new("0xsig");
//! let outcome = client.opt_in(&signer, "0xchannel", 42, "0xuser", &OptOptions::default()).await;
//! assert!(outcome.is_success());
//! assert_eq!(signer.calls(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::signing::{DomainDescriptor, Signature, SubscriptionMessage, TypeSchema, TypedDataSigner};
use crate::{EpnsError, Result};

/// Signer with scripted behaviour that records what it was asked to sign.
#[derive(Debug, Default)]
pub struct MockSigner {
    signature: String,
    failure: Option<String>,
    calls: AtomicUsize,
    last_domain: Mutex<Option<DomainDescriptor>>,
    last_message: Mutex<Option<SubscriptionMessage>>,
}

impl MockSigner {
    /// A signer that always returns `signature`.
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            ..Self::default()
        }
    }

    /// A signer that always fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Number of signing requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Domain of the most recent request.
    pub fn last_domain(&self) -> Option<DomainDescriptor> {
        self.last_domain.lock().ok().and_then(|d| d.clone())
    }

    /// Message of the most recent request.
    pub fn last_message(&self) -> Option<SubscriptionMessage> {
        self.last_message.lock().ok().and_then(|m| m.clone())
    }
}

#[async_trait]
impl TypedDataSigner for MockSigner {
    async fn sign_typed_data(
        &self,
        domain: &DomainDescriptor,
        _types: &TypeSchema,
        message: &SubscriptionMessage,
    ) -> Result<Signature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut slot) = self.last_domain.lock() {
            *slot = Some(domain.clone());
        }
        if let Ok(mut slot) = self.last_message.lock() {
            *slot = Some(message.clone());
        }

        match &self.failure {
            Some(reason) => Err(EpnsError::Signer(reason.clone())),
            None => Ok(Signature::new(self.signature.clone())),
        }
    }
}
