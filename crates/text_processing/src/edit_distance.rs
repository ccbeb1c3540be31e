//! Levenshtein distance and the normalized similarity derived from it

/// Classic Levenshtein edit distance, counted in characters
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let len_a = a_chars.len();
    let len_b = b_chars.len();

    if len_a == 0 {
        return len_b;
    }
    if len_b == 0 {
        return len_a;
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=len_b).collect();
    let mut curr_row: Vec<usize> = vec![0; len_b + 1];

    for i in 1..=len_a {
        curr_row[0] = i;
        for j in 1..=len_b {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len_b]
}

/// `1 - distance / max_len`, in `[0, 1]`
///
/// Two empty strings are identical and score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("malai", "malay"), 1);
        assert_eq!(levenshtein("costa", "kofta"), 2);
        assert_eq!(levenshtein("", "naan"), 4);
        assert_eq!(levenshtein("naan", ""), 4);
        assert_eq!(levenshtein("roti", "roti"), 0);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_only_for_equal() {
        let pairs = [("paneer", "panir"), ("korma", "corner"), ("dal", "daal")];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a));
            assert!(levenshtein(a, b) > 0);
        }
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("naan", "naan"), 1.0);
        assert!((similarity("malay", "malai") - 0.8).abs() < 1e-9);
        assert!((similarity("MLKST", "MLKFT") - 0.8).abs() < 1e-9);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 1.0);
    }
}
