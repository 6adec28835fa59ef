//! Static AFINN-style polarity lexicon.
//!
//! Each entry maps a lower-case token to an integer weight in `-5..=5`.
//! The table is fixed at compile time so scoring stays deterministic.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Tokens that flip the sign of the weight of the token right after them.
pub const NEGATORS: &[&str] = &[
    "cant", "can't", "dont", "don't", "doesnt", "doesn't", "not", "non", "wont", "won't", "isnt",
    "isn't",
];

#[rustfmt::skip]
const ENTRIES: &[(&str, i32)] = &[
    ("abandon", -2), ("abandoned", -2), ("abandons", -2), ("abort", -1), ("aborted", -1),
    ("abuse", -3), ("abused", -3), ("accept", 1), ("accepted", 1), ("accident", -2),
    ("accidental", -2), ("accidentally", -2), ("accurate", 1), ("active", 1), ("adequate", 1),
    ("admire", 3), ("advantage", 2), ("affected", -1), ("afraid", -2), ("aggravated", -2),
    ("agree", 1), ("alarm", -2), ("alarmed", -2), ("alert", -1), ("amazing", 4),
    ("angry", -3), ("annoy", -2), ("annoyed", -2), ("annoying", -2), ("anxious", -2),
    ("appreciate", 2), ("appreciated", 2), ("approve", 2), ("approved", 2), ("awesome", 4),
    ("awful", -3), ("bad", -3), ("badly", -3), ("beautiful", 3), ("best", 3),
    ("better", 2), ("block", -1), ("blocked", -2), ("blocker", -2), ("blocking", -1),
    ("bother", -2), ("bothered", -2), ("broke", -1), ("broken", -1), ("brilliant", 4),
    ("calm", 2), ("cancel", -1), ("cancelled", -1), ("careful", 2), ("careless", -2),
    ("catastrophic", -4), ("chaos", -2), ("clean", 2), ("clear", 1), ("clearly", 1),
    ("collapse", -2), ("collapsed", -2), ("comfortable", 2), ("complain", -2), ("complaint", -2),
    ("confused", -2), ("confusing", -2), ("confusion", -2), ("cool", 1), ("corrupt", -3),
    ("corrupted", -3), ("crash", -2), ("crashed", -2), ("crashes", -2), ("crashing", -2),
    ("critical", -2), ("damage", -3), ("damaged", -3), ("danger", -2), ("dangerous", -2),
    ("dead", -3), ("delay", -1), ("delayed", -1), ("delays", -1), ("delight", 3),
    ("delighted", 3), ("destroy", -3), ("destroyed", -3), ("difficult", -1), ("disappointed", -2),
    ("disappointing", -2), ("disaster", -2), ("dislike", -2), ("easy", 1), ("effective", 2),
    ("efficient", 2), ("elegant", 2), ("enjoy", 2), ("error", -2), ("errors", -2),
    ("excellent", 3), ("excited", 3), ("fail", -2), ("failed", -2), ("failing", -2),
    ("fails", -2), ("failure", -2), ("fantastic", 4), ("fatal", -3), ("fault", -2),
    ("faulty", -2), ("fear", -2), ("fine", 2), ("fixed", 2), ("flawless", 4),
    ("freeze", -1), ("frozen", -1), ("frustrated", -2), ("frustrating", -2), ("glad", 3),
    ("good", 3), ("great", 3), ("happy", 3), ("harm", -2), ("hate", -3),
    ("help", 2), ("helpful", 2), ("helping", 2), ("hurt", -2), ("impressive", 3),
    ("improve", 2), ("improved", 2), ("improvement", 2), ("inaccurate", -2), ("incorrect", -2),
    ("invalid", -2), ("irritating", -3), ("issue", -1), ("issues", -1), ("lag", -1),
    ("leak", -1), ("like", 2), ("lose", -3), ("losing", -3), ("loss", -3),
    ("lost", -3), ("love", 3), ("lovely", 3), ("mess", -2), ("messy", -2),
    ("miss", -2), ("missing", -2), ("mistake", -2), ("mistakes", -2), ("nice", 3),
    ("no", -1), ("ok", 2), ("okay", 2), ("outage", -2), ("pain", -2),
    ("panic", -3), ("perfect", 3), ("perfectly", 3), ("please", 1), ("pleased", 3),
    ("poor", -2), ("poorly", -2), ("problem", -2), ("problems", -2), ("ready", 1),
    ("reject", -1), ("rejected", -1), ("reliable", 2), ("resolve", 2), ("resolved", 2),
    ("risk", -2), ("risky", -2), ("safe", 1), ("secure", 2), ("severe", -2),
    ("smooth", 2), ("solid", 2), ("solve", 1), ("solved", 1), ("stable", 2),
    ("stuck", -2), ("success", 2), ("successful", 3), ("successfully", 3), ("super", 3),
    ("support", 2), ("terrible", -3), ("thank", 2), ("thanks", 2), ("threat", -2),
    ("timeout", -1), ("trouble", -2), ("ugly", -3), ("unable", -2), ("unhappy", -2),
    ("unresponsive", -2), ("unstable", -2), ("urgent", -1), ("useful", 2), ("useless", -2),
    ("vulnerable", -2), ("vulnerability", -2), ("warning", -3), ("weak", -2), ("win", 4),
    ("wonderful", 4), ("works", 1), ("worried", -3), ("worse", -3), ("worst", -3),
    ("wrong", -2), ("yes", 1),
];

static LEXICON: LazyLock<HashMap<&'static str, i32>> =
    LazyLock::new(|| ENTRIES.iter().copied().collect());

/// Weight of a lower-case token, if the lexicon knows it.
pub fn weight(token: &str) -> Option<i32> {
    LEXICON.get(token).copied()
}

pub fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token)
}
