//! # dnafeed
//!
//! Reproducible sampling of fixed-length training batches from collections of
//! per-sample DNA sequence archives.
//!
//! This crate re-exports the workspace crates behind feature flags:
//!
//! - `core`: base alphabet, the [`core::Archive`] trait and its backends, archive discovery.
//! - `sampling`: index tables, window extraction, k-mer encoding, the batch generator
//!   and the one-shot subsampler.
//!
//! ```toml
//! [dependencies]
//! dnafeed = { version = "0.1", default-features = false, features = ["sampling"] }
//! ```
//!
//! Enable `parallel` to assemble ranges of batches on a rayon thread pool.

#[cfg(feature = "core")]
#[doc(inline)]
pub use dnafeed_core as core;

#[cfg(feature = "sampling")]
#[doc(inline)]
pub use dnafeed_sampling as sampling;
