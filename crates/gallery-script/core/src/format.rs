//! Number and phone formatting

/// Inserts a `,` between every group of three digits.
///
/// Only integer digit grouping is done; a leading minus sign is kept as is.
pub fn add_commas(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

/// Strips every `,` from the string
pub fn remove_commas(s: &str) -> String {
    s.replace(',', "")
}

/// Formats an 11 digit phone number as `XXX-XXXX-XXXX`.
///
/// Non-digits are ignored when counting. Any other digit count returns the
/// input untouched, so partially typed numbers are left alone.
pub fn format_phone_number(phone_number: &str) -> String {
    let cleaned: String = phone_number.chars().filter(|c| c.is_ascii_digit()).collect();

    if cleaned.len() == 11 {
        format!("{}-{}-{}", &cleaned[..3], &cleaned[3..7], &cleaned[7..])
    } else {
        phone_number.to_string()
    }
}

/// Reformats a price input after each keystroke.
///
/// Returns `None` when the value (without commas) is empty or not a number,
/// meaning the input should be left as typed. Otherwise the integer prefix
/// is regrouped, so `"1234.5"` becomes `"1,234"`.
pub fn format_price_input(value: &str) -> Option<String> {
    let value = remove_commas(value);
    let trimmed = value.trim();

    if trimmed.is_empty() || !is_numeric(trimmed) {
        return None;
    }

    parse_int_prefix(trimmed).map(add_commas)
}

/// Decimal number check: optional sign, digits, optional fraction and exponent
fn is_numeric(s: &str) -> bool {
    let s = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let mut parts = mantissa.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }

    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(exp);
            !exp.is_empty() && all_digits(exp)
        }
    }
}

/// Leading integer of a string: optional sign followed by digits
fn parse_int_prefix(s: &str) -> Option<i64> {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(1234567, "1,234,567")]
    #[case(-1234, "-1,234")]
    #[case(-100, "-100")]
    fn test_add_commas(#[case] n: i64, #[case] expected: &str) {
        assert_eq!(add_commas(n), expected);
    }

    #[test]
    fn test_add_commas_round_trip() {
        for n in [0_i64, 7, 12, 123, 1_000, 98_765, 1_000_000, 12_345_678_901, i64::MAX] {
            let formatted = add_commas(n);
            let reparsed: i64 = remove_commas(&formatted).parse().unwrap();
            assert_eq!(add_commas(reparsed), formatted);
        }
    }

    #[test]
    fn test_remove_commas() {
        assert_eq!(remove_commas("1,234,567"), "1234567");
        assert_eq!(remove_commas("no commas"), "no commas");
        assert_eq!(remove_commas(",,"), "");
    }

    #[test]
    fn test_format_phone_number() {
        assert_eq!(format_phone_number("01012345678"), "010-1234-5678");
        assert_eq!(format_phone_number("010 1234 5678"), "010-1234-5678");
        assert_eq!(format_phone_number("010-1234-5678"), "010-1234-5678");
        assert_eq!(format_phone_number("123"), "123");
        assert_eq!(format_phone_number("0101234567"), "0101234567");
        assert_eq!(format_phone_number(""), "");
    }

    #[test]
    fn test_format_price_input() {
        assert_eq!(format_price_input("1234").as_deref(), Some("1,234"));
        assert_eq!(format_price_input("1,2345").as_deref(), Some("12,345"));
        assert_eq!(format_price_input("1234.56").as_deref(), Some("1,234"));
        assert_eq!(format_price_input("-5000").as_deref(), Some("-5,000"));
        assert_eq!(format_price_input(""), None);
        assert_eq!(format_price_input("12a"), None);
        assert_eq!(format_price_input("abc"), None);
    }

    #[test]
    fn test_format_price_input_without_integer_part() {
        // numeric, but there is no integer prefix to regroup
        assert_eq!(format_price_input(".5"), None);
    }
}
