//! Router loss injection.

use std::collections::BTreeSet;

use relaynet_proto::{Frame, LinkId};

use crate::{ConfigError, Environment};

/// How the router decides to discard frames.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LossModel {
    /// Never drop
    #[default]
    None,

    /// Drop each frame independently with this probability
    Rate(f64),

    /// Drop exactly these (link, sequence) frames
    Targeted(BTreeSet<(LinkId, u32)>),
}

impl LossModel {
    /// Drop the listed sequences on one link.
    pub fn targeted(link: LinkId, sequences: impl IntoIterator<Item = u32>) -> Self {
        Self::Targeted(sequences.into_iter().map(|sequence| (link, sequence)).collect())
    }

    /// Whether the router should discard `frame`.
    ///
    /// Only [`LossModel::Rate`] consumes randomness.
    pub fn should_drop<E: Environment>(&self, frame: &Frame, env: &E) -> bool {
        match self {
            Self::None => false,
            Self::Rate(rate) => env.random_unit() < *rate,
            Self::Targeted(frames) => frames.contains(&(frame.link(), frame.sequence)),
        }
    }

    /// Reject probabilities outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Rate(rate) if !(0.0..=1.0).contains(rate) => {
                Err(ConfigError::InvalidDropRate(*rate))
            },
            _ => Ok(()),
        }
    }
}
