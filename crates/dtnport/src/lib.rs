#![warn(missing_docs)]

//! Dtnport: a small public API facade for the workspace.
//!
//! This crate provides a clean, stable surface that re-exports the
//! primitives every component of the bundle protocol stack builds on:
//!
//! - SDNV wire codec (`Sdnv`, `SdnvEncoder`, `SdnvDecoder`)
//! - Split-representation quantities (`Scalar`)
//! - Reentrant locking (`ResourceLock`)
//! - Deferred diagnostics (`Diagnostics`, memo sinks)
//! - Bounded string composition (`compose_into`, `FormatArg`)
//!
//! Example
//! ```
//! use dtnport::{Diagnostics, SdnvDecoder, SdnvEncoder};
//!
//! // Encode a numeric field for the wire and read it back.
//! let sdnv = SdnvEncoder::encode(128);
//! assert_eq!(sdnv.as_slice(), &[0x81, 0x00]);
//! let (value, consumed) = SdnvDecoder::decode(sdnv.as_slice()).unwrap();
//! assert_eq!((value, consumed), (128, 2));
//!
//! // Report a problem, deferred until some convenient drain point.
//! let diag = Diagnostics::new();
//! diag.post_errmsg("bundle transmission failed", Some("node 42"));
//! diag.write_errmsg_memos();
//! ```

// Core: configuration, errors, locking, composition, text scanning
pub use dtnport_core::config::Config;
pub use dtnport_core::compose::{compose_into, compose_line, copy_into, FormatArg};
pub use dtnport_core::error::{ErrorKind, Result};
pub use dtnport_core::lock::{Guarded, LockGuard, ResourceLock};
pub use dtnport_core::text::{find_token, Tokens};
// Wire: numeric primitives
pub use dtnport_wire::scalar::{Scalar, ONE_GIG};
pub use dtnport_wire::sdnv::{Sdnv, SdnvDecoder, SdnvEncoder, MAX_SDNV_LEN};
// Diagnostics: deferred error messages and memo sinks
pub use dtnport_diag::{ChannelSink, Diagnostics, ErrmsgPool, MemoSink, StdoutSink, OMISSION_NOTICE};

/// Convenience prelude with the most commonly used items.
pub mod prelude {
    pub use crate::{
        compose_into, Config, Diagnostics, ErrorKind, FormatArg, MemoSink, ResourceLock, Result,
        Scalar, Sdnv, SdnvDecoder, SdnvEncoder,
    };
}
