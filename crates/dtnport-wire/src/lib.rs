#![warn(missing_docs)]

//! dtnport-wire: wire-format numeric primitives.
//!
//! This crate provides the two numeric building blocks every bundle
//! encoder and storage accountant in the stack relies on:
//!
//! - [`sdnv`] - the self-delimiting numeric value codec used to encode all
//!   numeric fields on the wire
//! - [`scalar`] - a split-representation quantity type for byte counts and
//!   durations that may exceed a native machine word
//!
//! Both are pure computations with no locking; callers synchronize access
//! to any shared buffer or scalar themselves.

/// Self-delimiting numeric value encoding and decoding.
pub mod sdnv;
/// Split-representation large-quantity arithmetic.
pub mod scalar;

pub use scalar::{Scalar, ONE_GIG};
pub use sdnv::{Sdnv, SdnvDecoder, SdnvEncoder, MAX_SDNV_LEN};
