//! Forces dynamic linking of `emage-rs` to speed up incremental builds.
//!
//! Enable it through the `dynamic_linking` feature of the root crate; it should not be used directly.

#![allow(unused_imports)]
pub use emage_internal::*;
