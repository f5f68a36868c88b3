//! ISBN normalization, validation and form conversion

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Prefix prepended when lifting a 10-digit ISBN to the 13-digit form.
const ISBN13_PREFIX: &str = "978";

lazy_static! {
    // ISBN-10 (nine digits plus digit-or-X check) or ISBN-13 (all digits)
    static ref ISBN_SHAPE: Regex = Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsbnError {
    #[error("isbn must be 10 or 13 characters, got {0}")]
    InvalidLength(usize),
    #[error("isbn contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Normalize a raw ISBN by dropping hyphens and spaces and upper-casing a
/// trailing x.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

fn validate_shape(isbn: &str) -> Result<(), IsbnError> {
    if isbn.len() != 10 && isbn.len() != 13 {
        return Err(IsbnError::InvalidLength(isbn.chars().count()));
    }
    if let Some(bad) = isbn.chars().find(|c| !c.is_ascii_digit() && *c != 'X') {
        return Err(IsbnError::InvalidCharacter(bad));
    }
    if !ISBN_SHAPE.is_match(isbn) {
        // an X anywhere but the ISBN-10 check position
        return Err(IsbnError::InvalidCharacter('X'));
    }
    Ok(())
}

/// Compute the ISBN-10 check digit for a 9-digit core.
///
/// Weighted sum (10, 9, ..., 2) modulo 11; a check value of 10 renders as
/// 'X' and 11 renders as '0'.
pub fn isbn10_check_digit(core: &str) -> char {
    let sum: u32 = core
        .chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap_or(0) * (10 - i as u32))
        .sum();
    match 11 - (sum % 11) {
        11 => '0',
        10 => 'X',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Compute the ISBN-13 check digit for a 12-digit core.
///
/// Alternating (1, 3) weights modulo 10; a modulo of 0 yields check digit 0.
pub fn isbn13_check_digit(core: &str) -> char {
    let sum: u32 = core
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let value = c.to_digit(10).unwrap_or(0);
            if i % 2 == 0 {
                value
            } else {
                value * 3
            }
        })
        .sum();
    match sum % 10 {
        0 => '0',
        m => char::from_digit(10 - m, 10).unwrap_or('0'),
    }
}

/// Validate the checksum of a normalized 10- or 13-character ISBN.
pub fn is_valid_checksum(isbn: &str) -> bool {
    let digits: Vec<char> = isbn.chars().collect();
    match digits.len() {
        10 => {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let value = if c == 'X' {
                        10
                    } else {
                        c.to_digit(10).unwrap_or(0)
                    };
                    value * (10 - i as u32)
                })
                .sum();
            sum % 11 == 0
        }
        13 => {
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let value = c.to_digit(10).unwrap_or(0);
                    if i % 2 == 0 {
                        value
                    } else {
                        value * 3
                    }
                })
                .sum();
            sum % 10 == 0
        }
        _ => false,
    }
}

/// Convert an ISBN to its opposite form, recomputing the check digit.
///
/// Input longer than 11 characters is treated as an ISBN-13 and converted to
/// ISBN-10 (prefix and check digit stripped, mod-11 digit recomputed);
/// anything else is treated as an ISBN-10 and lifted to ISBN-13 with the
/// fixed 978 prefix. Malformed input is rejected, never truncated.
pub fn opposite_form(isbn: &str) -> Result<String, IsbnError> {
    validate_shape(isbn)?;
    if isbn.len() > 11 {
        let core = &isbn[3..12];
        Ok(format!("{}{}", core, isbn10_check_digit(core)))
    } else {
        let core = format!("{}{}", ISBN13_PREFIX, &isbn[..9]);
        let check = isbn13_check_digit(&core);
        Ok(format!("{}{}", core, check))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("9780201882957", "0201882957" ; "thirteen to ten")]
    #[test_case("0201882957", "9780201882957" ; "ten to thirteen")]
    #[test_case("9788205377547", "8205377545" ; "norwegian thirteen to ten")]
    fn test_opposite_form(input: &str, expected: &str) {
        assert_eq!(opposite_form(input).unwrap(), expected);
    }

    #[test]
    fn test_check_digit_ten_renders_as_x() {
        // weighted sum 254, 254 % 11 == 1, check 10
        assert_eq!(isbn10_check_digit("097522980"), 'X');
    }

    #[test]
    fn test_check_digit_eleven_renders_as_zero() {
        // 0201882957 has check 7; find a core whose modulo is zero instead
        let core = "020188295";
        assert_eq!(isbn10_check_digit(core), '7');
        assert_eq!(isbn10_check_digit("000000000"), '0');
    }

    #[test_case("0306406152" ; "valid ten")]
    #[test_case("9780321125217" ; "valid thirteen")]
    #[test_case("097522980X" ; "valid ten with x check")]
    fn test_checksum_accepts(isbn: &str) {
        assert!(is_valid_checksum(isbn));
    }

    #[test_case("0306406151" ; "wrong ten check")]
    #[test_case("9780321125218" ; "wrong thirteen check")]
    #[test_case("12345" ; "wrong length")]
    fn test_checksum_rejects(isbn: &str) {
        assert!(!is_valid_checksum(isbn));
    }

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize("978-0-321-12521-7"), "9780321125217");
        assert_eq!(normalize("0-9752298-0-x"), "097522980X");
    }

    #[test]
    fn test_short_input_fails_explicitly() {
        assert_eq!(opposite_form("12345"), Err(IsbnError::InvalidLength(5)));
    }

    #[test]
    fn test_non_digit_input_fails_explicitly() {
        assert_eq!(
            opposite_form("97802o1882957"),
            Err(IsbnError::InvalidCharacter('o'))
        );
    }

    #[test]
    fn test_x_only_allowed_at_check_position() {
        assert_eq!(
            opposite_form("0X0188295X"),
            Err(IsbnError::InvalidCharacter('X'))
        );
    }

    #[test]
    fn test_converted_forms_carry_valid_checksums() {
        for isbn in ["9780201882957", "0201882957", "097522980X"] {
            let converted = opposite_form(isbn).unwrap();
            assert!(is_valid_checksum(&converted), "converted {}", converted);
        }
    }

    proptest! {
        #[test]
        fn roundtrip_from_isbn10(core in "[0-9]{9}") {
            let isbn10 = format!("{}{}", core, isbn10_check_digit(&core));
            let isbn13 = opposite_form(&isbn10).unwrap();
            prop_assert_eq!(isbn13.len(), 13);
            prop_assert!(is_valid_checksum(&isbn13));
            prop_assert_eq!(opposite_form(&isbn13).unwrap(), isbn10);
        }

        #[test]
        fn roundtrip_from_isbn13(core in "[0-9]{9}") {
            let body = format!("978{}", core);
            let isbn13 = format!("{}{}", body, isbn13_check_digit(&body));
            let isbn10 = opposite_form(&isbn13).unwrap();
            prop_assert_eq!(isbn10.len(), 10);
            prop_assert!(is_valid_checksum(&isbn10));
            prop_assert_eq!(opposite_form(&isbn10).unwrap(), isbn13);
        }
    }
}
