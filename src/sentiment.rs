//! Lexicon-based headline scorer producing a VADER-style compound score.
//!
//! Each token's valence (roughly -4..4) comes from `sentiment_lexicon.json`, is
//! nudged by nearby boosters, negators and ALL-CAPS emphasis, then the sum is
//! squashed into [-1, 1] with `x / sqrt(x² + ALPHA)`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static LEXICON: Lazy<HashMap<String, f64>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, f64>>(raw).expect("valid sentiment lexicon")
});

/// Normalization constant; approximates the max expected sum.
const ALPHA: f64 = 15.0;
/// Negated valences flip and shrink.
const N_SCALAR: f64 = -0.74;
/// Booster/dampener step.
const B_INCR: f64 = 0.293;
/// ALL-CAPS emphasis step.
const C_INCR: f64 = 0.733;
/// Per-'!' amplification, capped at four marks.
const EP_INCR: f64 = 0.292;

/// Anything that maps a headline to a compound score in [-1, 1].
///
/// Implementations must be deterministic: the same text always yields the
/// same score.
pub trait Scorer: Send + Sync {
    fn score(&self, text: &str) -> f64;
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_valence(&self, w: &str) -> f64 {
        LEXICON.get(w).copied().unwrap_or(0.0)
    }

    /// Raw (un-normalized) valence sum for `text`.
    pub fn valence_sum(&self, text: &str) -> f64 {
        // Scraped markup often spells apostrophes as U+2019 / U+2018.
        let text = text.replace(['\u{2019}', '\u{2018}'], "'");
        let raw: Vec<&str> = tokenize(&text).collect();
        let lower: Vec<String> = raw.iter().map(|t| t.to_lowercase()).collect();

        // Caps only count as emphasis when the headline isn't shouted as a whole.
        let caps_count = raw.iter().filter(|t| is_all_caps(t)).count();
        let caps_differential = caps_count > 0 && caps_count < raw.len();

        let mut sum = 0.0;
        for (i, w) in lower.iter().enumerate() {
            let mut v = self.word_valence(w);
            if v == 0.0 {
                continue;
            }

            if caps_differential && is_all_caps(raw[i]) {
                v += C_INCR * v.signum();
            }

            for k in 1..=3usize {
                if i < k {
                    break;
                }
                if let Some(step) = booster_step(&lower[i - k]) {
                    let damp = match k {
                        1 => 1.0,
                        2 => 0.95,
                        _ => 0.9,
                    };
                    v += step * v.signum() * damp;
                }
            }

            let negated = (1..=3).any(|k| i >= k && is_negator(&lower[i - k]));
            if negated {
                v *= N_SCALAR;
            }

            sum += v;
        }

        if sum != 0.0 {
            let marks = text.chars().filter(|c| *c == '!').count().min(4) as f64;
            sum += marks * EP_INCR * sum.signum();
        }
        sum
    }
}

impl Scorer for SentimentAnalyzer {
    fn score(&self, text: &str) -> f64 {
        normalize(self.valence_sum(text))
    }
}

/// Squash a valence sum into [-1, 1].
pub fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Word tokens (letters, digits, inner apostrophes), case preserved.
fn tokenize(s: &str) -> impl Iterator<Item = &str> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
}

fn is_all_caps(tok: &str) -> bool {
    tok.chars().any(|c| c.is_alphabetic()) && !tok.chars().any(|c| c.is_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "nor"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "without"
    )
}

fn booster_step(tok: &str) -> Option<f64> {
    match tok {
        "very" | "extremely" | "hugely" | "massive" | "massively" | "sharply" | "deeply"
        | "highly" | "really" | "most" | "totally" | "huge" | "record" => Some(B_INCR),
        "slightly" | "somewhat" | "barely" | "marginally" | "little" | "partly" | "kinda" => {
            Some(-B_INCR)
        }
        _ => None,
    }
}
