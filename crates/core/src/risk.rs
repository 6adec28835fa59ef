//! Lexicon-based risk scoring for bug text.
//!
//! The score is the sum of per-token polarity weights from
//! [`crate::lexicon`]; a token directly after a negator counts with the
//! opposite sign. The label is derived from the score with fixed cutoffs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::bug::BugRecord;
use crate::lexicon;

/// Scores at or below this value are high risk.
pub const HIGH_RISK_MAX_SCORE: i32 = -1;
/// Scores at or above this value are low risk.
pub const LOW_RISK_MIN_SCORE: i32 = 3;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[.,/#!?$%^&*;:{}=_`"~()\n]"#).expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "Standard")]
    Standard,
}

impl RiskLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "High Risk",
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::Standard => "Standard",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskClassification {
    pub label: RiskLabel,
    pub score: i32,
}

/// A bug with its display-only risk classification attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredBug {
    #[serde(flatten)]
    pub bug: BugRecord,
    pub risk: RiskClassification,
}

/// Split text into lower-case tokens the way the lexicon expects.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    PUNCTUATION_RE
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Sum lexicon weights over the tokens of `text`.
pub fn score(text: &str) -> i32 {
    let tokens = tokenize(text);
    let mut total = 0;
    for (i, token) in tokens.iter().enumerate() {
        let Some(weight) = lexicon::weight(token) else {
            continue;
        };
        let negated = i > 0 && lexicon::is_negator(&tokens[i - 1]);
        total += if negated { -weight } else { weight };
    }
    total
}

/// Map a score onto a label. Rules are evaluated in order.
pub fn classify(score: i32) -> RiskLabel {
    if score <= HIGH_RISK_MAX_SCORE {
        RiskLabel::HighRisk
    } else if score >= LOW_RISK_MIN_SCORE {
        RiskLabel::LowRisk
    } else {
        RiskLabel::Standard
    }
}

pub fn assess(text: &str) -> RiskClassification {
    let score = score(text);
    RiskClassification {
        label: classify(score),
        score,
    }
}

pub fn score_bug(bug: BugRecord) -> ScoredBug {
    let risk = assess(&bug.risk_text());
    ScoredBug { bug, risk }
}

/// Score a whole normalized batch, preserving order.
pub fn score_bugs(bugs: Vec<BugRecord>) -> Vec<ScoredBug> {
    bugs.into_iter().map(score_bug).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
