//! Port definitions (trait abstractions) for platform speech engines.
//!
//! Ports define the interfaces the voice layer expects from the platform.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No platform handles or globals in any signature: engines are injected
//!   by the composition root, so independent sessions never share state
//! - Commands are synchronous and return immediately
//! - Engines report lifecycle asynchronously as domain events
//!   ([`RecognitionEvent`](crate::domain::RecognitionEvent),
//!   [`SynthesisEvent`](crate::domain::SynthesisEvent)) through whatever
//!   channel the adapter was built with

pub mod recognition;
pub mod synthesis;

pub use recognition::{RecognitionConfig, RecognitionEngine};
pub use synthesis::SynthesisEngine;

#[cfg(any(test, feature = "test-utils"))]
pub use recognition::MockRecognitionEngine;
#[cfg(any(test, feature = "test-utils"))]
pub use synthesis::MockSynthesisEngine;
