use std::fmt::Display;
use std::str::FromStr;

use ndarray::{Array1, ArrayD};
use serde::{Deserialize, Serialize};

///
/// What accompanies the feature tensor of a batch.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// The index of the archive each item was drawn from.
    #[serde(alias = "sample_ids")]
    SampleOrigin,
    /// The raw base codes, for masked single-base prediction.
    #[serde(alias = "onemer")]
    SingleBaseTarget,
    /// The k-mer codes themselves, for autoencoding.
    #[serde(alias = "kmer")]
    KmerTarget,
    /// Features only.
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    SampleOrigin(Array1<u32>),
    Bases(ArrayD<u8>),
    Kmers(ArrayD<u32>),
}

impl Labels {
    pub fn shape(&self) -> &[usize] {
        match self {
            Labels::SampleOrigin(origin) => origin.shape(),
            Labels::Bases(bases) => bases.shape(),
            Labels::Kmers(kmers) => kmers.shape(),
        }
    }
}

///
/// One batch: k-mer codes shaped `(batch, window - k + 1)` or
/// `(batch, group, window - k + 1)`, plus the labels selected by the [`LabelMode`].
///
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub features: ArrayD<u32>,
    pub labels: Option<Labels>,
}

impl Batch {
    pub fn into_parts(self) -> (ArrayD<u32>, Option<Labels>) {
        (self.features, self.labels)
    }
}

impl LabelMode {
    ///
    /// Assemble a batch from its raw windows, encoded features and per-item archive indices.
    ///
    pub fn package(self, raw: ArrayD<u8>, features: ArrayD<u32>, origin: Array1<u32>) -> Batch {
        let labels = match self {
            LabelMode::SampleOrigin => Some(Labels::SampleOrigin(origin)),
            LabelMode::SingleBaseTarget => Some(Labels::Bases(raw)),
            LabelMode::KmerTarget => Some(Labels::Kmers(features.clone())),
            LabelMode::None => None,
        };
        Batch { features, labels }
    }
}

impl FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sample_origin" | "sample_ids" => Ok(LabelMode::SampleOrigin),
            "single_base_target" | "onemer" => Ok(LabelMode::SingleBaseTarget),
            "kmer_target" | "kmer" => Ok(LabelMode::KmerTarget),
            "none" => Ok(LabelMode::None),
            _ => Err(format!("Unknown label mode: {s}")),
        }
    }
}

impl Display for LabelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabelMode::SampleOrigin => write!(f, "sample_origin"),
            LabelMode::SingleBaseTarget => write!(f, "single_base_target"),
            LabelMode::KmerTarget => write!(f, "kmer_target"),
            LabelMode::None => write!(f, "none"),
        }
    }
}
