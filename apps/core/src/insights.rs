//! Business insights over stored per-aspect results.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::absa::{Aspect, Sentiment};
use crate::models::AspectRecord;

pub const DEFAULT_MIN_RATING: f32 = 4.0;
pub const DEFAULT_TOP_N: usize = 10;

const STOPWORDS: &[&str] = &[
    "the", "and", "but", "for", "with", "this", "that", "was", "are", "its", "not", "very",
    "too", "has", "had", "have", "after", "just", "really", "all", "from", "they", "you",
];

const PROBLEM_WORDS: &[&str] = &[
    "bad", "blurry", "breaks", "broken", "cheap", "costly", "crashes", "dark", "dead", "dies",
    "dim", "disappointing", "drain", "drains", "draining", "expensive", "flimsy", "freezes",
    "grainy", "hang", "hangs", "heating", "high", "hot", "lag", "laggy", "noisy", "overheats",
    "overpriced", "poor", "short", "slow", "stuck", "terrible", "waste", "weak", "worst",
];

// NOTE: expect() is acceptable here, the pattern is a compile-time constant
static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("Invalid regex: word pattern"));

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(100.0 * part as f64 / whole as f64)
}

/// Count and share of one sentiment within an aspect
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub count: usize,
    pub percentage: f64,
}

/// Sentiment breakdown for one aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectDistribution {
    pub aspect: Aspect,
    pub total: usize,
    pub positive: Share,
    pub negative: Share,
    pub neutral: Share,
}

impl AspectDistribution {
    pub fn share(&self, sentiment: Sentiment) -> Share {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }
}

/// Per-aspect sentiment counts and percentages, in first-seen aspect order.
pub fn aspect_distribution(records: &[AspectRecord]) -> Vec<AspectDistribution> {
    let mut counts: IndexMap<&Aspect, [usize; 3]> = IndexMap::new();
    for record in records {
        let slot = match record.sentiment {
            Sentiment::Positive => 0,
            Sentiment::Negative => 1,
            Sentiment::Neutral => 2,
        };
        counts.entry(&record.aspect).or_default()[slot] += 1;
    }

    counts
        .into_iter()
        .map(|(aspect, [pos, neg, neu])| {
            let total = pos + neg + neu;
            let share = |count| Share {
                count,
                percentage: percentage(count, total),
            };
            AspectDistribution {
                aspect: aspect.clone(),
                total,
                positive: share(pos),
                negative: share(neg),
                neutral: share(neu),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectCount {
    pub aspect: Aspect,
    pub count: usize,
}

/// Highly rated reviews that still criticize some aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMismatch {
    pub min_rating: f32,
    pub rated_reviews: usize,
    pub mismatched_reviews: usize,
    pub mismatch_percentage: f64,
    /// Negative verdicts per aspect among those reviews, most frequent first
    pub top_aspects: Vec<AspectCount>,
}

/// Share of distinct reviews rated at least `min_rating` that carry a
/// negative aspect verdict. Records without a rating are ignored.
pub fn rating_mismatch(records: &[AspectRecord], min_rating: f32) -> RatingMismatch {
    let high: Vec<&AspectRecord> = records
        .iter()
        .filter(|r| r.rating.is_some_and(|rating| rating >= min_rating))
        .collect();

    let rated: HashSet<&str> = high.iter().map(|r| r.review_id.as_str()).collect();

    let negative: Vec<&AspectRecord> = high
        .into_iter()
        .filter(|r| r.sentiment == Sentiment::Negative)
        .collect();
    let mismatched: HashSet<&str> = negative.iter().map(|r| r.review_id.as_str()).collect();

    let mut per_aspect: HashMap<&Aspect, usize> = HashMap::new();
    for record in &negative {
        *per_aspect.entry(&record.aspect).or_default() += 1;
    }
    let mut top_aspects: Vec<AspectCount> = per_aspect
        .into_iter()
        .map(|(aspect, count)| AspectCount {
            aspect: aspect.clone(),
            count,
        })
        .collect();
    top_aspects.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.aspect.cmp(&b.aspect)));

    RatingMismatch {
        min_rating,
        rated_reviews: rated.len(),
        mismatched_reviews: mismatched.len(),
        mismatch_percentage: percentage(mismatched.len(), rated.len()),
        top_aspects,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Most frequent problem words per aspect in negative verdict sentences.
pub fn root_causes(records: &[AspectRecord], top_n: usize) -> IndexMap<Aspect, Vec<WordCount>> {
    let mut words: IndexMap<&Aspect, HashMap<String, usize>> = IndexMap::new();

    for record in records.iter().filter(|r| r.sentiment == Sentiment::Negative) {
        let counter = words.entry(&record.aspect).or_default();
        let lowered = record.sentence.to_lowercase();
        for token in WORD_PATTERN.find_iter(&lowered).map(|m| m.as_str()) {
            if !STOPWORDS.contains(&token) && PROBLEM_WORDS.contains(&token) {
                *counter.entry(token.to_string()).or_default() += 1;
            }
        }
    }

    words
        .into_iter()
        .map(|(aspect, counter)| {
            let mut ranked: Vec<WordCount> = counter
                .into_iter()
                .map(|(word, count)| WordCount { word, count })
                .collect();
            ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
            ranked.truncate(top_n);
            (aspect.clone(), ranked)
        })
        .collect()
}
