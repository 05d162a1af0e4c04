//! Block-oriented binary delta codec.
//!
//! Given a reference byte stream and a target byte stream, the encoder emits
//! a compact patch that rewrites the reference into the target, block by
//! block: blocks that match the reference in place, blocks found elsewhere
//! in the reference, blocks whose XOR against the reference run-length
//! encodes well, and blocks carried verbatim. The patch is wrapped in a
//! container carrying the CRC-32 of the target, which the applier verifies
//! after reconstruction.

pub mod apply;
pub mod container;
pub mod dict;
pub mod encode;
pub mod error;
pub mod record;
pub mod rle;
pub mod version;

pub use apply::{apply_patch, rebuild};
pub use encode::{create_patch, generate_patch, DEFAULT_BLOCK_SIZE};
pub use error::{PatchError, Result};
