//! `cadence-core`: keystroke-biometric fuzzy extractor for Cadence.
//!
//! Turns noisy keystroke timing into a reproducible 32-byte secret:
//! a [`quantizer`] maps raw timing to a fixed-length [`Code`], and the
//! [`FuzzyExtractor`] binds a random Reed–Solomon codeword to that code via
//! public [`HelperData`]. A later capture within `t` symbols of the
//! enrollment code recovers the same [`Secret`].
//!
//! Pure computation: zero network, zero async, zero file I/O. Randomness is
//! always injected by the caller.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod params;

pub mod code;
pub mod features;
pub mod quantizer;

pub mod field;
pub mod reed_solomon;

pub mod secret;

pub mod extractor;
pub mod helper;

pub mod enrollment;

pub mod calibration;

pub mod signer;

pub use calibration::{characterize_rejection, perturb, RejectionSample};
pub use code::Code;
pub use enrollment::Enrollment;
pub use error::FuzzyError;
pub use extractor::FuzzyExtractor;
pub use features::{FeatureSet, KeystrokeTiming};
pub use helper::{HelperData, HELPER_FORMAT_VERSION, HELPER_HEADER_LEN, HELPER_MAGIC};
pub use params::{FuzzyConfig, Profile, QuantizerParams, SchemeParams, Tradeoff};
pub use quantizer::quantize;
pub use secret::{Secret, SECRET_LEN};
pub use signer::{verify, SigningIdentity, PUBLIC_KEY_LEN, SIGNATURE_LEN};
