//! Contention text normalization.
//!
//! Reduces a free-text condition description to a canonical, order-independent
//! word-set key. Stages run in a fixed order:
//!
//! 1. Cause-clause truncation ("X due to Y" keeps "X")
//! 2. Punctuation removal (apostrophes deleted, everything else → space)
//! 3. Digit and single-letter removal
//! 4. Common-word removal (whole words only)
//! 5. Lower-case and trim
//!
//! Removing a separator or a common word can join a cause word to the next
//! word ("secondary; tobacco" → "secondary tobacco"), so the stages repeat
//! until the text stops changing.
//!
//! The output only ever contains vocabulary words that survived the stoplist,
//! which is what makes normalized tokens safe to log.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Causal phrases, in priority order. Only the first one found truncates.
const CAUSE_TERMS: &[&str] = &["due to", "secondary to", "because of"];

/// Words that never carry classification signal. Sorted.
const COMMON_WORDS: &[&str] = &[
    "about", "also", "an", "and", "are", "as", "at", "be", "been", "bilateral", "both", "by",
    "condition", "conditions", "for", "from", "has", "have", "in", "into", "is", "left", "my",
    "of", "on", "or", "pain", "painful", "right", "side", "sided", "that", "the", "their", "to",
    "was", "were", "with",
];

static APOSTROPHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"['\u{2018}\u{2019}]").expect("valid apostrophe regex"));

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{Nd}\s]").expect("valid punctuation regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").expect("valid digit regex"));

static SINGLE_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\p{L}\b").expect("valid single-letter regex"));

static COMMON_WORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = COMMON_WORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid common-word regex")
});

// ═══════════════════════════════════════════════════════════
// Pipeline
// ═══════════════════════════════════════════════════════════

/// Run the full normalization pipeline.
///
/// Deterministic and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let mut current = normalize_pass(text);
    // After the first pass every stage only deletes, so this terminates.
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let lowered = text.to_lowercase();
    let text = truncate_cause_clause(&lowered);
    let text = remove_punctuation(text);
    let text = remove_digits_and_single_letters(&text);
    let text = remove_common_words(&text);
    text.to_lowercase().trim().to_string()
}

/// Keep only the text preceding the first causal phrase.
///
/// Expects lower-cased input. Terms are tried in `CAUSE_TERMS` order, so
/// "x because of y due to z" truncates at "due to".
pub fn truncate_cause_clause(lowered: &str) -> &str {
    for term in CAUSE_TERMS {
        if let Some(idx) = lowered.find(term) {
            return &lowered[..idx];
        }
    }
    lowered
}

/// Delete apostrophes, turn other punctuation into spaces, collapse whitespace.
pub fn remove_punctuation(text: &str) -> String {
    let text = APOSTROPHES.replace_all(text, "");
    let text = PUNCTUATION.replace_all(&text, " ");
    collapse_whitespace(&text)
}

/// Delete digits, then standalone single letters.
///
/// Digits go first: "x1" must not leave a fresh single letter behind.
pub fn remove_digits_and_single_letters(text: &str) -> String {
    let text = DIGITS.replace_all(text, "");
    let text = SINGLE_LETTERS.replace_all(&text, "");
    collapse_whitespace(&text)
}

/// Delete whole-word stoplist matches. Substrings of longer words are kept.
pub fn remove_common_words(text: &str) -> String {
    let text = COMMON_WORDS_RE.replace_all(text, "");
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

// ═══════════════════════════════════════════════════════════
// Word-set key
// ═══════════════════════════════════════════════════════════

/// Order-independent lookup key: sorted, de-duplicated tokens joined by a space.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordSetKey(String);

impl WordSetKey {
    /// Build a key from already-normalized text.
    pub fn from_normalized(normalized: &str) -> Self {
        let words: BTreeSet<&str> = normalized.split_whitespace().collect();
        Self(words.into_iter().collect::<Vec<_>>().join(" "))
    }

    /// Normalize raw text and build its key.
    pub fn from_text(text: &str) -> Self {
        Self::from_normalized(&normalize(text))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|t| !t.is_empty())
    }
}

impl fmt::Display for WordSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_at_first_priority_term() {
        assert_eq!(truncate_cause_clause("knee due to fall"), "knee ");
        assert_eq!(truncate_cause_clause("back secondary to knee"), "back ");
        assert_eq!(truncate_cause_clause("hip because of gait"), "hip ");
        // "due to" outranks "because of" even when it appears later
        assert_eq!(
            truncate_cause_clause("a because of b due to c"),
            "a because of b "
        );
        assert_eq!(truncate_cause_clause("tinnitus"), "tinnitus");
    }

    #[test]
    fn truncation_to_empty_prefix_yields_empty_output() {
        assert_eq!(normalize("due to exposure"), "");
        assert_eq!(normalize("   secondary to knee"), "");
    }

    #[test]
    fn apostrophes_collapse_into_word() {
        assert_eq!(remove_punctuation("veteran's knee"), "veterans knee");
        assert_eq!(remove_punctuation("don\u{2019}t"), "dont");
    }

    #[test]
    fn punctuation_becomes_space() {
        assert_eq!(remove_punctuation("ptsd/anxiety,  (chronic)"), "ptsd anxiety chronic");
        assert_eq!(remove_punctuation("low-back_strain"), "low back strain");
    }

    #[test]
    fn removes_digits_then_single_letters() {
        assert_eq!(remove_digits_and_single_letters("type 2 diabetes"), "type diabetes");
        assert_eq!(remove_digits_and_single_letters("l5 s1 disc"), "disc");
        assert_eq!(remove_digits_and_single_letters("a knee b"), "knee");
    }

    #[test]
    fn common_words_removed_as_whole_words_only() {
        assert_eq!(remove_common_words("pain in the left knee"), "knee");
        assert_eq!(remove_common_words("lore"), "lore");
        assert_eq!(remove_common_words("Right Shoulder"), "Shoulder");
        assert_eq!(remove_common_words("tinnitus and hearing"), "tinnitus hearing");
    }

    #[test]
    fn normalize_full_pipeline() {
        assert_eq!(
            normalize("ACL TEAR (ANTERIOR CRUCIATE LIGAMENT TEAR"),
            "acl tear anterior cruciate ligament tear"
        );
        assert_eq!(normalize("migraines (headaches), due to something"), "migraines headaches");
        assert_eq!(normalize("Bilateral knee pain, 2019"), "knee");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "ACL TEAR (ANTERIOR CRUCIATE LIGAMENT TEAR",
            "migraines (headaches), due to something",
            "x1 y2 z",
            "Veteran's PTSD -- because of combat",
            "pain of the right side to the left",
            "sleep apnea; CPAP @ night #3",
            "Résumé: élevé 2nd-degree burns",
            "   ",
            "tinnitus\tringing\nears",
            "lung condition, secondary; tobacco use",
            "headaches (because) often",
            "knee due 2 torn meniscus",
            "knee due the tobacco",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn cause_terms_joined_by_later_stages_still_truncate() {
        assert_eq!(normalize("lung condition, secondary; tobacco use"), "lung");
        assert_eq!(normalize("headaches (because) often"), "headaches");
        assert_eq!(normalize("knee due 2 torn meniscus"), "knee");
        // Common-word removal joins "due" and "tobacco"
        assert_eq!(normalize("knee due the tobacco"), "knee");
        // Whole cause words with no following "to"/"of" are ordinary tokens
        assert_eq!(normalize("due date"), "due date");
    }

    #[test]
    fn word_set_key_is_order_independent_and_deduplicated() {
        let a = WordSetKey::from_text("tear ligament knee tear");
        let b = WordSetKey::from_text("Knee ligament tear");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "knee ligament tear");
        assert_eq!(a.tokens().count(), 3);
    }

    #[test]
    fn empty_text_gives_empty_key() {
        let key = WordSetKey::from_text("the left and right");
        assert!(key.is_empty());
        assert_eq!(key.tokens().count(), 0);
    }

    #[test]
    fn common_words_sorted() {
        for window in COMMON_WORDS.windows(2) {
            assert!(
                window[0] < window[1],
                "COMMON_WORDS not sorted: {:?} >= {:?}",
                window[0],
                window[1]
            );
        }
    }
}
