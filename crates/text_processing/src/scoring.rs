//! Candidate scorers
//!
//! Three independent signals per (transcript, item) pair plus the direct-match
//! bonus. All inputs are expected to be normalized; every score is in `[0, 1]`.

use menu_voice_config::constants::matching;
use menu_voice_config::MatchingConfig;
use menu_voice_core::{MenuItem, SignalBreakdown};

use crate::edit_distance::similarity;
use crate::normalize::{normalize, tokens};
use crate::phonetic::{encode, PhoneticCodes};

/// Transcript with its derived forms computed once per resolution
#[derive(Debug, Clone)]
pub struct PreparedTranscript {
    pub normalized: String,
    pub codes: PhoneticCodes,
}

impl PreparedTranscript {
    pub fn new(transcript: &str) -> Self {
        let normalized = normalize(transcript);
        let codes = encode(&normalized);
        Self { normalized, codes }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Best similarity over every (transcript code, item code) pair
pub fn phonetic_score(a: &PhoneticCodes, b: &PhoneticCodes) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    a.codes()
        .flat_map(|x| b.codes().map(move |y| code_similarity(x, y)))
        .fold(0.0, f64::max)
}

fn code_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(b) || b.contains(a) {
        return matching::PHONETIC_SUBSTRING_SCORE;
    }
    similarity(a, b)
}

/// Per-token fuzzy similarity
///
/// Each transcript token contributes its best similarity against the item's
/// tokens when that similarity exceeds `floor`. The sum is divided by the
/// larger token count so missing and spurious words cost the same.
pub fn token_score(transcript: &str, item_name: &str, floor: f64) -> f64 {
    let spoken = tokens(transcript);
    let listed = tokens(item_name);
    if spoken.is_empty() || listed.is_empty() {
        return 0.0;
    }

    let total: f64 = spoken
        .iter()
        .map(|s| {
            let best = listed
                .iter()
                .map(|l| if s == l { 1.0 } else { similarity(s, l) })
                .fold(0.0, f64::max);
            if best > floor {
                best
            } else {
                0.0
            }
        })
        .sum();

    total / spoken.len().max(listed.len()) as f64
}

/// Similarity against curated synonyms; zero when the item has none
pub fn keyword_score(transcript: &str, keywords: &[String]) -> f64 {
    if transcript.is_empty() {
        return 0.0;
    }

    let mut best: f64 = 0.0;
    for keyword in keywords {
        let keyword = normalize(keyword);
        if keyword.is_empty() {
            continue;
        }
        if keyword == transcript {
            return 1.0;
        }
        if keyword.contains(transcript) || transcript.contains(keyword.as_str()) {
            best = best.max(matching::KEYWORD_SUBSTRING_SCORE);
        }
    }
    best
}

/// Override for exact, prefix and substring hits on the item name
pub fn direct_bonus(transcript: &str, item_name: &str) -> f64 {
    if transcript.is_empty() || item_name.is_empty() {
        return 0.0;
    }
    if transcript == item_name {
        matching::DIRECT_EXACT
    } else if item_name.starts_with(transcript) || transcript.starts_with(item_name) {
        matching::DIRECT_PREFIX
    } else if item_name.contains(transcript) || transcript.contains(item_name) {
        matching::DIRECT_SUBSTRING
    } else {
        0.0
    }
}

/// Score one item: weighted fusion of the three signals, overridden by the
/// direct bonus when that is higher
pub fn score_item(
    transcript: &PreparedTranscript,
    item: &MenuItem,
    config: &MatchingConfig,
) -> (f64, SignalBreakdown) {
    let name = normalize(&item.name);
    let phonetic_source = normalize(item.phonetic_source());

    let phonetic = phonetic_score(&transcript.codes, &encode(&phonetic_source));
    let token = token_score(&transcript.normalized, &name, config.token_match_floor);
    let keyword = keyword_score(&transcript.normalized, item.keywords());
    let direct = direct_bonus(&transcript.normalized, &name);

    let weights = &config.weights;
    let weighted = weights.phonetic * phonetic + weights.token * token + weights.keyword * keyword;

    let breakdown = SignalBreakdown {
        phonetic,
        token,
        keyword,
        weighted,
        direct,
    };

    (weighted.max(direct), breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_phonetic_score() {
        let a = encode("malay costa");
        let b = encode("malai kofta");
        assert!(approx(phonetic_score(&a, &b), 0.8));

        assert_eq!(phonetic_score(&encode("tikka"), &encode("tika")), 1.0);
        assert!(approx(
            phonetic_score(&encode("lamb curry"), &encode("lamb curry bowl")),
            0.8
        ));
        assert_eq!(phonetic_score(&encode(""), &b), 0.0);
    }

    #[test]
    fn test_phonetic_score_uses_alternates() {
        // PRJR vs FXKR on primaries, PRKR vs FXKR via the alternate
        let burger = encode("burger");
        let fish_curry = encode("fish curry");
        assert!(approx(phonetic_score(&burger, &fish_curry), 0.5));
    }

    #[test]
    fn test_token_score() {
        assert_eq!(token_score("garlic naan", "garlic naan", 0.6), 1.0);
        // malay~malai counts (0.8), costa~kofta sits exactly on the floor
        assert!(approx(token_score("malay costa", "malai kofta", 0.6), 0.4));
        // spurious word in the item name halves the score
        assert!(approx(token_score("naan", "garlic naan", 0.6), 0.5));
        assert_eq!(token_score("", "garlic naan", 0.6), 0.0);
    }

    #[test]
    fn test_keyword_score() {
        let keywords = vec!["murgh makhani".to_string(), "Butter Chkn".to_string()];
        assert_eq!(keyword_score("murgh makhani", &keywords), 1.0);
        assert!(approx(keyword_score("makhani", &keywords), 0.8));
        assert_eq!(keyword_score("butter chkn", &keywords), 1.0);
        assert_eq!(keyword_score("fish", &keywords), 0.0);
        assert_eq!(keyword_score("makhani", &[]), 0.0);
    }

    #[test]
    fn test_direct_bonus() {
        assert_eq!(direct_bonus("fish curry", "fish curry"), 1.0);
        assert_eq!(direct_bonus("lamb curry", "lamb curry bowl"), 0.95);
        assert_eq!(direct_bonus("lamb curry bowl large", "lamb curry bowl"), 0.95);
        assert_eq!(direct_bonus("curry", "fish curry"), 0.85);
        assert_eq!(direct_bonus("burger", "fish curry"), 0.0);
        assert_eq!(direct_bonus("", "fish curry"), 0.0);
    }

    #[test]
    fn test_score_item_fusion() {
        let config = MatchingConfig::default();
        let transcript = PreparedTranscript::new("Malay Costa");
        let item = MenuItem::new("1", "Malai Kofta", 1299);

        let (score, breakdown) = score_item(&transcript, &item, &config);
        assert!(approx(breakdown.phonetic, 0.8));
        assert!(approx(breakdown.token, 0.4));
        assert_eq!(breakdown.keyword, 0.0);
        assert_eq!(breakdown.direct, 0.0);
        assert!(approx(score, 0.56));
    }

    #[test]
    fn test_direct_bonus_overrides_weighted_sum() {
        let config = MatchingConfig::default();
        let transcript = PreparedTranscript::new("chicken dum biryani");
        let item = MenuItem::new("1", "Chicken Dum Biryani", 1699);

        let (score, breakdown) = score_item(&transcript, &item, &config);
        assert_eq!(breakdown.direct, 1.0);
        assert_eq!(score, 1.0);
    }
}
