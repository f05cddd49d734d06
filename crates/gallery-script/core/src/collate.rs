//! Korean, numeric-aware string collation
//!
//! Approximates `localeCompare(other, "ko", { numeric: true })`:
//! runs of ASCII digits compare by numeric value, Hangul sorts ahead of
//! Han and Latin. Hangul compares jamo by jamo, so a bare consonant sits
//! with the syllables it starts. Latin letters compare by base letter
//! first, then by accent, then by case with lowercase winning ties.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Digits(&'a str),
    Char(char),
}

/// Primary weight groups, in collation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Group {
    Whitespace,
    Punctuation,
    Digit,
    Hangul,
    Han,
    Latin,
    Other,
}

/// Compare two strings with Korean collation and numeric digit runs
pub fn compare(a: &str, b: &str) -> Ordering {
    let sa = segments(a);
    let sb = segments(b);

    primary(&sa, &sb)
        .then_with(|| accent_level(&sa, &sb))
        .then_with(|| case_level(&sa, &sb))
        .then_with(|| a.cmp(b))
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut iter = s.char_indices().peekable();

    while let Some((start, c)) = iter.next() {
        if c.is_ascii_digit() {
            let mut end = start + 1;
            while let Some(&(i, d)) = iter.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + 1;
                iter.next();
            }
            out.push(Segment::Digits(&s[start..end]));
        } else {
            out.push(Segment::Char(c));
        }
    }

    out
}

fn primary(a: &[Segment<'_>], b: &[Segment<'_>]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = match (x, y) {
            (Segment::Digits(x), Segment::Digits(y)) => compare_numeric(x, y),
            (Segment::Digits(_), Segment::Char(c)) => Group::Digit.cmp(&group(*c)),
            (Segment::Char(c), Segment::Digits(_)) => group(*c).cmp(&Group::Digit),
            (Segment::Char(x), Segment::Char(y)) => primary_key(*x).cmp(&primary_key(*y)),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    a.len().cmp(&b.len())
}

/// Unaccented letters sort before accented ones with the same base
fn accent_level(a: &[Segment<'_>], b: &[Segment<'_>]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Segment::Char(x), Segment::Char(y)) = (x, y) {
            let ord = accent(*x).cmp(&accent(*y));
            if ord != Ordering::Equal {
                return ord;
            }
        }
    }
    Ordering::Equal
}

fn accent(c: char) -> Option<char> {
    latin_base(c).map(|_| c.to_lowercase().next().unwrap_or(c))
}

/// Lowercase sorts before uppercase when the letters are otherwise equal
fn case_level(a: &[Segment<'_>], b: &[Segment<'_>]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        if let (Segment::Char(x), Segment::Char(y)) = (x, y) {
            let ord = x.is_uppercase().cmp(&y.is_uppercase());
            if ord != Ordering::Equal {
                return ord;
            }
        }
    }
    Ordering::Equal
}

/// Compare two digit runs as non-negative integers of any length
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn primary_key(c: char) -> (Group, u32, u32, u32) {
    match group(c) {
        Group::Hangul => {
            let (lead, vowel, tail) = hangul_key(c);
            (Group::Hangul, lead, vowel, tail)
        }
        Group::Latin => {
            let base = latin_base(c).unwrap_or(c);
            let folded = base.to_lowercase().next().unwrap_or(base);
            (Group::Latin, folded as u32, 0, 0)
        }
        g => (g, c as u32, 0, 0),
    }
}

const SYLLABLE_BASE: u32 = 0xAC00;
const LEAD_COUNT: u32 = 19;
const VOWEL_COUNT: u32 = 21;

/// Leading consonant index for compatibility jamo U+3131..=U+314E.
/// Final-only clusters (ㄳ, ㄵ, ...) are `None`.
const COMPAT_LEADS: [Option<u32>; 30] = [
    Some(0),  // ㄱ
    Some(1),  // ㄲ
    None,     // ㄳ
    Some(2),  // ㄴ
    None,     // ㄵ
    None,     // ㄶ
    Some(3),  // ㄷ
    Some(4),  // ㄸ
    Some(5),  // ㄹ
    None,     // ㄺ
    None,     // ㄻ
    None,     // ㄼ
    None,     // ㄽ
    None,     // ㄾ
    None,     // ㄿ
    None,     // ㅀ
    Some(6),  // ㅁ
    Some(7),  // ㅂ
    Some(8),  // ㅃ
    None,     // ㅄ
    Some(9),  // ㅅ
    Some(10), // ㅆ
    Some(11), // ㅇ
    Some(12), // ㅈ
    Some(13), // ㅉ
    Some(14), // ㅊ
    Some(15), // ㅋ
    Some(16), // ㅌ
    Some(17), // ㅍ
    Some(18), // ㅎ
];

/// Decompose into (lead, vowel, tail) weights.
///
/// A syllable weighs its leading consonant, then its vowel, then its final
/// consonant. A lone consonant weighs the same lead with no vowel, so it
/// sorts right before the syllables it starts. Lone vowels and final-only
/// clusters sort after every syllable.
fn hangul_key(c: char) -> (u32, u32, u32) {
    let cp = c as u32;
    let vowels_at = LEAD_COUNT;
    let finals_at = LEAD_COUNT + VOWEL_COUNT;

    match c {
        '\u{AC00}'..='\u{D7A3}' => {
            let s = cp - SYLLABLE_BASE;
            (s / 588, (s % 588) / 28 + 1, s % 28)
        }
        '\u{1100}'..='\u{1112}' => (cp - 0x1100, 0, 0),
        '\u{1161}'..='\u{1175}' => (vowels_at + cp - 0x1161, 0, 0),
        '\u{11A8}'..='\u{11C2}' => (finals_at + cp - 0x11A7, 0, 0),
        '\u{3131}'..='\u{314E}' => match COMPAT_LEADS[(cp - 0x3131) as usize] {
            Some(lead) => (lead, 0, 0),
            None => (finals_at, 0, cp),
        },
        '\u{314F}'..='\u{3163}' => (vowels_at + cp - 0x314F, 0, 0),
        _ => (u32::MAX, 0, cp),
    }
}

/// Base letter of an accented Latin-1 or Latin Extended-A letter
fn latin_base(c: char) -> Option<char> {
    let base = match c {
        'À'..='Æ' | 'à'..='æ' | 'Ā'..='ą' => 'a',
        'Ç' | 'ç' | 'Ć'..='č' => 'c',
        'Ð' | 'ð' | 'Ď'..='đ' => 'd',
        'È'..='Ë' | 'è'..='ë' | 'Ē'..='ě' => 'e',
        'Ĝ'..='ģ' => 'g',
        'Ĥ'..='ħ' => 'h',
        'Ì'..='Ï' | 'ì'..='ï' | 'Ĩ'..='ĳ' => 'i',
        'Ĵ' | 'ĵ' => 'j',
        'Ķ'..='ĸ' => 'k',
        'Ĺ'..='ł' => 'l',
        'Ñ' | 'ñ' | 'Ń'..='ŋ' => 'n',
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' | 'Ō'..='œ' => 'o',
        'Ŕ'..='ř' => 'r',
        'ß' | 'Ś'..='š' | 'ſ' => 's',
        'Þ' | 'þ' | 'Ţ'..='ŧ' => 't',
        'Ù'..='Ü' | 'ù'..='ü' | 'Ũ'..='ų' => 'u',
        'Ŵ' | 'ŵ' => 'w',
        'Ý' | 'ý' | 'ÿ' | 'Ŷ'..='Ÿ' => 'y',
        'Ź'..='ž' => 'z',
        _ => return None,
    };
    Some(base)
}

fn group(c: char) -> Group {
    match c {
        c if c.is_whitespace() => Group::Whitespace,
        c if c.is_ascii_digit() => Group::Digit,
        // Hangul Jamo, compatibility Jamo, syllables
        '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' | '\u{AC00}'..='\u{D7A3}' => {
            Group::Hangul
        }
        // CJK unified ideographs and extension A
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' => Group::Han,
        c if c.is_ascii_alphabetic() => Group::Latin,
        // Latin-1 supplement and Latin extended letters
        '\u{00C0}'..='\u{024F}' if c.is_alphabetic() => Group::Latin,
        c if c.is_alphanumeric() => Group::Other,
        _ => Group::Punctuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<&str>) -> Vec<&str> {
        items.sort_by(|a, b| compare(a, b));
        items
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(sorted(vec!["10", "2", "1"]), vec!["1", "2", "10"]);
        assert_eq!(
            sorted(vec!["item 10", "item 9", "item 100"]),
            vec!["item 9", "item 10", "item 100"]
        );
        assert_eq!(compare("007", "7"), Ordering::Less);
        assert_eq!(compare("10000000000000000000000", "9"), Ordering::Greater);
    }

    #[test]
    fn test_hangul_order() {
        assert_eq!(sorted(vec!["하늘", "가을", "나무"]), vec!["가을", "나무", "하늘"]);
        assert_eq!(compare("가", "a"), Ordering::Less);
        assert_eq!(compare("가", "家"), Ordering::Less);
    }

    #[test]
    fn test_digits_before_letters() {
        assert_eq!(compare("1번", "가"), Ordering::Less);
        assert_eq!(compare("9", "a"), Ordering::Less);
        assert_eq!(compare(" a", "a"), Ordering::Less);
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(vec!["b", "A", "a", "B"]), vec!["a", "A", "b", "B"]);
        assert_eq!(compare("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn test_accented_latin_sorts_by_base_letter() {
        assert_eq!(compare("été", "zebra"), Ordering::Less);
        assert_eq!(sorted(vec!["f", "é", "e"]), vec!["e", "é", "f"]);
        assert_eq!(
            sorted(vec!["Zurich", "Öl", "Orange", "Ångström"]),
            vec!["Ångström", "Öl", "Orange", "Zurich"]
        );
        assert_eq!(compare("é", "É"), Ordering::Less);
    }

    #[test]
    fn test_compatibility_jamo_sit_with_their_syllables() {
        assert_eq!(compare("ㅎ", "가"), Ordering::Greater);
        assert_eq!(compare("ㅎ", "하"), Ordering::Less);
        assert_eq!(compare("ㄱ", "가"), Ordering::Less);
        assert_eq!(sorted(vec!["하", "ㅎ", "나", "ㄴ", "가"]), vec!["가", "ㄴ", "나", "ㅎ", "하"]);
        assert_eq!(compare("ㅏ", "힣"), Ordering::Greater);
    }

    #[test]
    fn test_syllables_compare_by_jamo() {
        // 각 = ㄱ+ㅏ+ㄱ, 개 = ㄱ+ㅐ
        assert_eq!(sorted(vec!["개", "각", "가"]), vec!["가", "각", "개"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare("김", "김철수"), Ordering::Less);
        assert_eq!(compare("", "a"), Ordering::Less);
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }
}
