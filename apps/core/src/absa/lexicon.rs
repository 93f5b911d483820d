//! Lexicon-based sentiment classifier.
//!
//! Scores words against weighted positive/negative lists tuned for product
//! reviews, with negation and intensifier handling. The summed polarity is
//! turned into a probability distribution with a softmax, so the confidence
//! behaves like a model's top-class probability. No model file required.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::classifier::{softmax, Classification, LabelScore, Sentiment, SentimentClassifier};
use crate::error::AppError;

/// Logit given to the neutral class; text with no polar words lands here
const NEUTRAL_LOGIT: f32 = 0.5;

/// Number of following tokens a negation word flips
const NEGATION_WINDOW: usize = 3;

/// Upper bound on the product of stacked intensifiers
const MAX_INTENSITY: f32 = 3.0;

const POSITIVE_WORDS: &[(&str, f32)] = &[
    ("excellent", 3.0),
    ("amazing", 3.0),
    ("outstanding", 3.0),
    ("fantastic", 3.0),
    ("perfect", 3.0),
    ("superb", 3.0),
    ("awesome", 2.5),
    ("incredible", 2.5),
    ("love", 2.5),
    ("loved", 2.5),
    ("loves", 2.5),
    ("best", 2.5),
    ("great", 2.0),
    ("impressive", 2.0),
    ("beautiful", 2.0),
    ("brilliant", 2.0),
    ("good", 1.5),
    ("nice", 1.5),
    ("solid", 1.5),
    ("sturdy", 1.5),
    ("premium", 1.5),
    ("reliable", 1.5),
    ("smooth", 1.5),
    ("sharp", 1.5),
    ("crisp", 1.5),
    ("bright", 1.5),
    ("vibrant", 1.5),
    ("clear", 1.5),
    ("fast", 1.5),
    ("quick", 1.5),
    ("snappy", 1.5),
    ("responsive", 1.5),
    ("affordable", 1.5),
    ("worth", 1.5),
    ("recommend", 1.5),
    ("happy", 1.5),
    ("satisfied", 1.5),
    ("lasts", 1.0),
    ("decent", 1.0),
    ("better", 1.0),
    ("fine", 0.5),
];

const NEGATIVE_WORDS: &[(&str, f32)] = &[
    ("terrible", 3.0),
    ("awful", 3.0),
    ("horrible", 3.0),
    ("worst", 3.0),
    ("useless", 3.0),
    ("garbage", 3.0),
    ("hate", 2.5),
    ("hated", 2.5),
    ("dead", 2.5),
    ("broken", 2.5),
    ("defective", 2.5),
    ("bad", 2.0),
    ("poor", 2.0),
    ("disappointing", 2.0),
    ("disappointed", 2.0),
    ("overpriced", 2.0),
    ("waste", 2.0),
    ("crashes", 2.0),
    ("freezes", 2.0),
    ("overheats", 2.0),
    ("dies", 2.0),
    ("drains", 2.0),
    ("flimsy", 2.0),
    ("blurry", 2.0),
    ("laggy", 2.0),
    ("worse", 1.5),
    ("slow", 1.5),
    ("lag", 1.5),
    ("lags", 1.5),
    ("drain", 1.5),
    ("cheap", 1.5),
    ("fragile", 1.5),
    ("breaks", 1.5),
    ("grainy", 1.5),
    ("dim", 1.5),
    ("expensive", 1.5),
    ("costly", 1.5),
    ("mediocre", 1.5),
    ("weak", 1.5),
    ("noisy", 1.0),
    ("dark", 1.0),
    ("short", 1.0),
    ("heavy", 1.0),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "hardly", "barely", "isn't", "wasn't", "aren't", "don't",
    "doesn't", "didn't", "won't", "can't", "cannot", "nothing",
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("extremely", 1.8),
    ("incredibly", 1.8),
    ("very", 1.5),
    ("super", 1.5),
    ("really", 1.3),
    ("so", 1.2),
    ("quite", 1.1),
    ("somewhat", 0.7),
    ("slightly", 0.5),
];

static POLARITY: LazyLock<HashMap<&'static str, f32>> = LazyLock::new(|| {
    POSITIVE_WORDS
        .iter()
        .map(|&(w, s)| (w, s))
        .chain(NEGATIVE_WORDS.iter().map(|&(w, s)| (w, -s)))
        .collect()
});

static MODIFIERS: LazyLock<HashMap<&'static str, f32>> =
    LazyLock::new(|| INTENSIFIERS.iter().copied().collect());

/// Polarity totals for one text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolarityScore {
    pub positive: f32,
    pub negative: f32,
    pub matched_words: usize,
}

/// Rule-based classifier over a weighted review lexicon
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    temperature: f32,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self { temperature: 1.0 }
    }

    /// Lower temperature gives more decisive probabilities
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        if temperature > 0.0 {
            self.temperature = temperature;
        }
        self
    }

    /// Sum positive and negative evidence in `text`
    pub fn score(&self, text: &str) -> PolarityScore {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut score = PolarityScore::default();
        let mut negate_until = 0usize;
        let mut multiplier = 1.0f32;

        for (i, token) in tokens.iter().enumerate() {
            if NEGATIONS.contains(token) {
                negate_until = i + 1 + NEGATION_WINDOW;
                continue;
            }
            if let Some(&m) = MODIFIERS.get(token) {
                multiplier = (multiplier * m).min(MAX_INTENSITY);
                continue;
            }

            if let Some(&polarity) = POLARITY.get(token) {
                let mut value = polarity * multiplier;
                if i < negate_until {
                    // "not great" is weaker than "bad"
                    value = -value * 0.75;
                }
                if value >= 0.0 {
                    score.positive += value;
                } else {
                    score.negative -= value;
                }
                score.matched_words += 1;
            }
            multiplier = 1.0;
        }

        score
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Result<Classification, AppError> {
        let score = self.score(text);
        let logits = [score.positive, score.negative, NEUTRAL_LOGIT];
        let probabilities = softmax(&logits, self.temperature);

        let distribution = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
            .into_iter()
            .zip(probabilities)
            .map(|(sentiment, probability)| LabelScore {
                sentiment,
                probability,
            })
            .collect();

        Classification::from_distribution(distribution)
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}
