//! # Formats Module
//!
//! Serialization formats for Cheevos persisted state.
//!
//! Settings I/O lives in the `settings` module; this module only transforms
//! values to and from their stored text form.

mod save_codec;

pub use save_codec::*;
