//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`constants`]: Socket geometry, control-byte bits and other magic numbers
//! - [`register`]: The register table (offset, width, block)
//!
//! # Stability
//!
//! **WARNING:** Only items re-exported from the crate root are stable.

pub(crate) mod constants;
pub(crate) mod register;
