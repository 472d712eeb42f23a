//! # dnafeed-sampling
//!
//! Fixed-shape training batches from collections of per-sample sequence archives.
//!
//! ## Purpose
//!
//! Each sample is an [`Archive`](dnafeed_core::Archive) of variable-length sequences. This
//! crate turns N such archives into reproducible, shuffled batches of fixed-length windows,
//! optionally balanced across archives, optionally randomly placed within their
//! sequences, optionally grouped, and optionally folded into overlapping k-mer codes.
//!
//! ## Main Components
//!
//! - **[`IndexTable`]**: the materialized draws (archive, key, window placement) for one epoch
//! - **[`WindowExtractor`]**: clips fixed-length windows out of sequences
//! - **[`KmerEncoder`]**: folds `k` consecutive base codes into one integer
//! - **[`BalancePolicy`] / [`AugmentPolicy`]**: control how the index table is drawn
//! - **[`BatchGenerator`]**: serves batches of an epoch, single-sequence or grouped
//! - **[`random_subsamples`]**: one-shot grouped sampling without an epoch lifecycle
//!
//! ## Example
//!
//! ```rust
//! use dnafeed_core::InMemoryArchive;
//! use dnafeed_sampling::{BatchGenerator, GeneratorConfig, LabelMode};
//!
//! let archives = vec![
//!     InMemoryArchive::new("a", vec![vec![0, 1, 2, 3, 0, 1]; 10]),
//!     InMemoryArchive::new("b", vec![vec![3, 2, 1, 0, 3, 2]; 20]),
//! ];
//! let config = GeneratorConfig::new(4, 42)
//!     .with_kmer(2)
//!     .with_batch_size(2)
//!     .with_batches_per_epoch(1)
//!     .with_label_mode(LabelMode::SampleOrigin);
//!
//! let mut generator = BatchGenerator::from_seed(archives, config).unwrap();
//! let batch = generator.get_batch(0).unwrap();
//! assert_eq!(batch.features.shape(), &[2, 3]);
//!
//! generator.on_epoch_boundary().unwrap();
//! ```
//!
pub mod config;
pub mod errors;
mod fetch;
pub mod generator;
pub mod index;
pub mod kmer;
pub mod labels;
pub mod policy;
pub mod subsample;
pub mod window;

// re-export things
pub use config::*;
pub use errors::*;
pub use generator::*;
pub use index::{IndexTable, SamplingShape};
pub use kmer::KmerEncoder;
pub use labels::*;
pub use policy::*;
pub use subsample::*;
pub use window::{WindowExtractor, clip, valid_offset_range};
