//! Indefinite retry with exponential backoff.
//!
//! Calls that must eventually succeed for consensus to make progress are wrapped in a
//! [`RetryPolicy`]. The policy never gives up on a [`RetryError::Transient`] failure. A
//! [`RetryError::Permanent`] failure stops the loop and is handed back to the caller.

pub mod backoff;
pub mod policy;

pub use backoff::{BackoffConfig, ExponentialBackoff};
pub use policy::{RetryError, RetryPolicy};
