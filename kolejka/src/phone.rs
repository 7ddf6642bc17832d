//! Polish phone number normalization.
//!
//! Provider phone numbers arrive in whatever shape the facility typed
//! into the registry: `+48 12 400 12 00`, `124-001-200`, bare digits.
//! This module reduces them to the nine-digit national number and
//! renders a canonical `+48 XXX XXX XXX` form for display and tel links.

/// Separators tolerated inside a written-down number.
const SEPARATORS: &[char] = &[' ', '-', '(', ')', '.'];

/// True when `raw` is a well-formed Polish subscriber number, with or
/// without the country prefix.
pub fn is_valid_polish_phone(raw: &str) -> bool {
    national_digits(raw).is_some()
}

/// Canonical `+48 XXX XXX XXX` rendering of `raw`.
///
/// Returns `None` for anything that does not reduce to a nine-digit
/// national number.
pub fn format_phone(raw: &str) -> Option<String> {
    let digits = national_digits(raw)?;
    Some(format!(
        "+48 {} {} {}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9]
    ))
}

/// Strips separators and an optional leading `+`; rejects any other
/// non-digit character.
fn digits_of(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !SEPARATORS.contains(&c) {
            return None;
        }
    }
    Some(digits)
}

/// The nine-digit national number, with `48` / `0048` prefixes stripped.
fn national_digits(raw: &str) -> Option<String> {
    let digits = digits_of(raw)?;

    let national = if let Some(rest) = digits.strip_prefix("0048") {
        rest
    } else if let Some(rest) = digits.strip_prefix("48") {
        // A bare country code only counts when a full number follows;
        // nine-digit numbers that happen to start with 48 stay whole
        if rest.len() == 9 {
            rest
        } else {
            digits.as_str()
        }
    } else {
        digits.as_str()
    };

    if national.len() == 9 {
        Some(national.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_international_with_separators() {
        assert_eq!(
            format_phone("+48 12 400 12 00").as_deref(),
            Some("+48 124 001 200")
        );
    }

    #[test]
    fn test_formats_bare_national_digits() {
        assert_eq!(format_phone("124001200").as_deref(), Some("+48 124 001 200"));
    }

    #[test]
    fn test_strips_country_code_without_plus() {
        assert_eq!(
            format_phone("48 124 001 200").as_deref(),
            Some("+48 124 001 200")
        );
        assert_eq!(
            format_phone("0048124001200").as_deref(),
            Some("+48 124 001 200")
        );
    }

    #[test]
    fn test_hyphen_and_parenthesis_separators() {
        assert_eq!(
            format_phone("(12) 400-12-00").as_deref(),
            Some("+48 124 001 200")
        );
    }

    #[test]
    fn test_nine_digits_starting_with_48_stay_whole() {
        // 481 234 567 is a valid subscriber number, not 48 + 1234567
        assert_eq!(
            format_phone("481 234 567").as_deref(),
            Some("+48 481 234 567")
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(format_phone("12 400 12"), None);
        assert_eq!(format_phone("1240012000"), None);
        assert_eq!(format_phone(""), None);
    }

    #[test]
    fn test_letters_rejected() {
        assert_eq!(format_phone("call 124001200"), None);
        assert!(!is_valid_polish_phone("12400120o"));
    }

    #[test]
    fn test_validity_matches_formatter() {
        assert!(is_valid_polish_phone("+48 12 400 12 00"));
        assert!(is_valid_polish_phone("124001200"));
        assert!(!is_valid_polish_phone("112"));
    }
}
