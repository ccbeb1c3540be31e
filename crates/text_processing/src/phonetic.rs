//! Double-metaphone style phonetic encoder
//!
//! Reduces a normalized string to its consonant skeleton. Ambiguous
//! spellings (soft G, CH, TH) also produce an alternate code, so "biryani"
//! and "biriyani" or "chai" and "kai" end up comparable.
//!
//! Codes are computed over the whole string with spaces skipped and are not
//! length-capped: menu names are short and the full skeleton carries the
//! signal that separates "Lamb Curry" from "Lamb Curry Bowl".

/// Primary and optional alternate encoding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneticCodes {
    pub primary: String,
    pub alternate: Option<String>,
}

impl PhoneticCodes {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// All distinct codes, primary first
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.alternate.as_deref())
    }
}

/// Builds both codes side by side
struct CodeBuilder {
    primary: String,
    alternate: String,
}

impl CodeBuilder {
    fn push(&mut self, code: char) {
        self.primary.push(code);
        self.alternate.push(code);
    }

    fn push_split(&mut self, primary: char, alternate: char) {
        self.primary.push(primary);
        self.alternate.push(alternate);
    }

    fn finish(self) -> PhoneticCodes {
        let alternate = (self.alternate != self.primary).then_some(self.alternate);
        PhoneticCodes {
            primary: self.primary,
            alternate,
        }
    }
}

/// Encode a normalized string
pub fn encode(text: &str) -> PhoneticCodes {
    let chars: Vec<char> = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let mut out = CodeBuilder {
        primary: String::new(),
        alternate: String::new(),
    };

    if chars.is_empty() {
        return out.finish();
    }

    let mut i = 0;

    // Leading vowel is kept as a marker, all later vowels are dropped
    if is_vowel(chars[0]) {
        out.push('A');
        i = 1;
    }

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        let next2 = chars.get(i + 2).copied();

        match c {
            'b' => {
                out.push('P');
                i += if next == Some('b') { 2 } else { 1 };
            }
            'c' => {
                if next == Some('h') {
                    out.push_split('X', 'K');
                    i += 2;
                } else if next == Some('k') {
                    out.push('K');
                    i += 2;
                } else if matches!(next, Some('i') | Some('e') | Some('y')) {
                    out.push('S'); // soft C
                    i += 1;
                } else {
                    out.push('K');
                    i += if next == Some('c') { 2 } else { 1 };
                }
            }
            'd' => {
                if next == Some('g') && matches!(next2, Some('e') | Some('i') | Some('y')) {
                    out.push('J');
                    i += 3;
                } else {
                    out.push('T');
                    i += if next == Some('d') { 2 } else { 1 };
                }
            }
            'f' | 'v' => {
                out.push('F');
                i += if next == Some(c) { 2 } else { 1 };
            }
            'g' => {
                if next == Some('h') {
                    // "ghee", "gh" in "ghost": hard; mid-word "gh" is silent
                    if i == 0 {
                        out.push('K');
                    }
                    i += 2;
                } else if next == Some('n') && next2.is_none() {
                    i += 2;
                } else if matches!(next, Some('i') | Some('e') | Some('y')) {
                    out.push_split('J', 'K');
                    i += 1;
                } else {
                    out.push('K');
                    i += if next == Some('g') { 2 } else { 1 };
                }
            }
            'h' => {
                let prev_vowel = i > 0 && is_vowel(chars[i - 1]);
                let next_vowel = next.map(is_vowel).unwrap_or(false);
                if (i == 0 && next_vowel) || (prev_vowel && next_vowel) {
                    out.push('H');
                }
                i += 1;
            }
            'j' => {
                out.push('J');
                i += 1;
            }
            'k' => {
                // "kh" in "makhani", "khichdi"
                out.push('K');
                i += if matches!(next, Some('k') | Some('h')) { 2 } else { 1 };
            }
            'l' | 'm' | 'n' | 'r' => {
                out.push(c.to_ascii_uppercase());
                i += if next == Some(c) { 2 } else { 1 };
            }
            'p' => {
                if next == Some('h') {
                    out.push('F');
                    i += 2;
                } else {
                    out.push('P');
                    i += if next == Some('p') { 2 } else { 1 };
                }
            }
            'q' => {
                out.push('K');
                i += if next == Some('u') { 2 } else { 1 };
            }
            's' => {
                if next == Some('h') {
                    out.push('X');
                    i += 2;
                } else {
                    out.push('S');
                    i += if next == Some('s') { 2 } else { 1 };
                }
            }
            't' => {
                if next == Some('h') {
                    out.push_split('0', 'T');
                    i += 2;
                } else if next == Some('i') && next2 == Some('o') {
                    out.push('X');
                    i += 3;
                } else {
                    out.push('T');
                    i += if next == Some('t') { 2 } else { 1 };
                }
            }
            'w' | 'y' => {
                if next.map(is_vowel).unwrap_or(false) {
                    out.push(c.to_ascii_uppercase());
                }
                i += 1;
            }
            'x' => {
                out.push('K');
                out.push('S');
                i += 1;
            }
            'z' => {
                out.push('S');
                i += if next == Some('z') { 2 } else { 1 };
            }
            '0'..='9' => {
                out.push(c);
                i += 1;
            }
            _ => {
                // vowels and anything unexpected
                i += 1;
            }
        }
    }

    out.finish()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
