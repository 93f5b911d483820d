//! Per-aspect aggregation of clause observations.
//!
//! Every aspect keeps only its highest-confidence observation. On an exact
//! tie the observation seen first wins, so identical input always yields the
//! same verdicts.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::aspect::Aspect;
use super::classifier::Sentiment;

/// One (aspect, sentiment, confidence, clause) judgment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub aspect: Aspect,
    pub sentiment: Sentiment,
    /// Unrounded classifier confidence (0.0 - 1.0)
    pub confidence: f32,
    /// Clause that produced the judgment
    pub clause: String,
}

impl Observation {
    pub fn new(
        aspect: impl Into<Aspect>,
        sentiment: Sentiment,
        confidence: f32,
        clause: impl Into<String>,
    ) -> Self {
        Self {
            aspect: aspect.into(),
            sentiment,
            confidence,
            clause: clause.into(),
        }
    }
}

/// Aspect → winning observation, in first-seen aspect order
pub type AggregatedVerdicts = IndexMap<Aspect, Observation>;

/// Reduce observations to one verdict per aspect
pub fn aggregate<I>(observations: I) -> AggregatedVerdicts
where
    I: IntoIterator<Item = Observation>,
{
    observations
        .into_iter()
        .fold(IndexMap::new(), |mut verdicts, observation| {
            match verdicts.entry(observation.aspect.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(observation);
                }
                Entry::Occupied(mut slot) => {
                    if observation.confidence > slot.get().confidence {
                        slot.insert(observation);
                    }
                }
            }
            verdicts
        })
}
