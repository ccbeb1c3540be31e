//! Text normalization
//!
//! Every scorer compares normalized text only. Output contains nothing but
//! `[a-z0-9]` words separated by single spaces, with no leading or trailing
//! whitespace.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Case-fold, fold accents to their base letter, and strip everything that
/// is not an ASCII letter or digit
///
/// Word boundaries follow Unicode segmentation, so hyphens and brackets split
/// words while in-word apostrophes do not (`"that's"` -> `"thats"`).
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for word in text.unicode_words() {
        let cleaned: String = fold_word(word)
            .nfd()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();

        if cleaned.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&cleaned);
    }

    out
}

/// Lowercase and expand ligatures NFD does not decompose
fn fold_word(word: &str) -> String {
    word.to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe")
}

/// Whitespace tokens of an already normalized string
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("  Malai  KOFTA "), "malai kofta");
        assert_eq!(
            normalize("Chicken Dum Biryani (Regular)"),
            "chicken dum biryani regular"
        );
        assert_eq!(normalize("Fish-Curry"), "fish curry");
        assert_eq!(normalize("That's all"), "thats all");
        assert_eq!(normalize("2 Garlic Naan!"), "2 garlic naan");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!--()"), "");
    }

    #[test]
    fn test_accents_fold_to_base_letters() {
        assert_eq!(normalize("Crème Brûlée"), "creme brulee");
        assert_eq!(normalize("Jalapeño Poppers"), "jalapeno poppers");
        assert_eq!(normalize("Café au Lait"), "cafe au lait");
        assert_eq!(normalize("Bœuf Bourguignon"), "boeuf bourguignon");
        assert_eq!(normalize("Weißwurst"), "weisswurst");
        assert_eq!(normalize("ÆBLESKIVER"), "aebleskiver");
        // Scripts without a Latin base still drop out
        assert_eq!(normalize("Paneer 辣"), "paneer");
    }

    #[test]
    fn test_idempotent_and_charset() {
        let samples = [
            "Malai Kofta",
            "  Butter   Chicken Cashew ",
            "Crème brûlée / Tiramisu",
            "ALOO-gobi (half)",
            "x\t\ny",
            "naan, roti & paratha",
            "",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            assert!(!once.starts_with(' ') && !once.ends_with(' '));
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn test_tokens() {
        assert_eq!(tokens("lamb curry bowl"), vec!["lamb", "curry", "bowl"]);
        assert!(tokens("").is_empty());
    }
}
