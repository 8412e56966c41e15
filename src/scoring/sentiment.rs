// =============================================================================
// Headline Sentiment Scorer — Keyword dictionary
// =============================================================================
//
// Scores a batch of news headlines into [0, 100] using two fixed keyword
// sets:
//
// Step 1 — Lowercase each headline.
// Step 2 — Count every positive keyword found as a substring (+1 to the
//          signed score per occurrence of a keyword, one per keyword per
//          headline) and symmetrically every negative keyword (-1).
// Step 3 — total = positive hits + negative hits.
//          total == 0  =>  50 (no opinion signal)
//          otherwise   =>  round(50 + signed/total * 50), clamped to [0, 100]
//
// A single headline may match several keywords; each match counts
// independently. The scorer is a pure function of its input batch — no state
// carries across calls.
// =============================================================================

use serde::Serialize;

/// Keywords that push the score towards 100.
const POSITIVE_KEYWORDS: &[&str] = &[
    "gain", "bull", "bullish", "surge", "rally", "up", "moon", "pump",
    "positive", "beat", "record", "growth", "increase", "win",
];

/// Keywords that push the score towards 0.
const NEGATIVE_KEYWORDS: &[&str] = &[
    "drop", "down", "bear", "bearish", "dump", "crash", "loss", "decline",
    "sell", "negative", "risk", "liquidation", "fall", "slump",
];

/// Result of scoring one headline batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SentimentBreakdown {
    /// Sentiment score in [0, 100]. 50 means neutral / no signal.
    pub score: u8,
    /// Number of positive keyword matches across the batch.
    pub positive_hits: u32,
    /// Number of negative keyword matches across the batch.
    pub negative_hits: u32,
}

impl Default for SentimentBreakdown {
    fn default() -> Self {
        Self {
            score: 50,
            positive_hits: 0,
            negative_hits: 0,
        }
    }
}

/// Score a batch of headlines.
///
/// # Edge cases
/// - Empty batch => neutral 50 with zero hits.
/// - Headlines with no keyword match contribute nothing.
/// - All-positive batches reach 100 only when every hit is positive
///   (signed == total); mixed batches land strictly between.
pub fn score_headlines<S: AsRef<str>>(headlines: &[S]) -> SentimentBreakdown {
    let mut signed: i64 = 0;
    let mut positive_hits: u32 = 0;
    let mut negative_hits: u32 = 0;

    for headline in headlines {
        let lowered = headline.as_ref().to_lowercase();

        for keyword in POSITIVE_KEYWORDS {
            if lowered.contains(keyword) {
                signed += 1;
                positive_hits += 1;
            }
        }
        for keyword in NEGATIVE_KEYWORDS {
            if lowered.contains(keyword) {
                signed -= 1;
                negative_hits += 1;
            }
        }
    }

    let total = positive_hits + negative_hits;
    if total == 0 {
        return SentimentBreakdown::default();
    }

    let raw = 50.0 + (signed as f64 / total as f64) * 50.0;
    let score = raw.round().clamp(0.0, 100.0) as u8;

    SentimentBreakdown {
        score,
        positive_hits,
        negative_hits,
    }
}
