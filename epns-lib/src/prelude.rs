//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use epns_lib::prelude::*;
//! ```

// Client
pub use crate::channels::{ActionOutcome, ChannelClient, ChannelRecord, OptOptions};
pub use crate::config::ClientConfig;

// Error handling
pub use crate::errors::{EpnsError, EpnsErrorCode};
pub use crate::Result;

// Signing
pub use crate::signing::{
    ChannelAction, DomainDescriptor, PresignedSigner, Signature, SubscriptionMessage, TypeSchema,
    TypedData, TypedDataSigner,
};
