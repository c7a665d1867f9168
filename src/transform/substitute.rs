//! Substitution techniques
//!
//! `substitute_fake` detects the shape of the original value and emits a
//! category-plausible synthetic replacement; `substitute_random`
//! replaces characters, optionally preserving format (letters stay
//! letters, digits stay digits). Both draw from a caller-owned seedable
//! RNG so runs are reproducible in tests.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Alex", "Casey", "Jordan", "Morgan", "Riley", "Taylor", "Quinn", "Avery", "Drew", "Jamie",
    "Cameron", "Reese", "Skyler", "Parker", "Rowan", "Sage",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brooks", "Carter", "Dawson", "Ellis", "Foster", "Grayson", "Hayes", "Irwin",
    "Jennings", "Keller", "Lawson", "Mercer", "Nolan", "Osborne", "Porter",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mail.test", "sample.io",
];

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Elm", "Birch", "Willow", "Aspen", "Chestnut", "Juniper", "Laurel",
];

const STREET_TYPES: &[&str] = &["Street", "Avenue", "Road", "Lane", "Drive", "Court"];

/// Broad shape of a value, used to pick a plausible replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Email,
    Name,
    Phone,
    Address,
    Ssn,
    Date,
    Generic,
}

/// Guess the shape of a value
pub fn detect_shape(value: &str) -> ValueShape {
    let trimmed = value.trim();
    if trimmed.contains('@') && trimmed.contains('.') && !trimmed.contains(' ') {
        return ValueShape::Email;
    }
    if is_ssn_shaped(trimmed) {
        return ValueShape::Ssn;
    }
    if is_phone_shaped(trimmed) {
        return ValueShape::Phone;
    }
    if parse_loose_date(trimmed).is_some() {
        return ValueShape::Date;
    }
    if is_address_shaped(trimmed) {
        return ValueShape::Address;
    }
    if is_name_shaped(trimmed) {
        return ValueShape::Name;
    }
    ValueShape::Generic
}

fn is_ssn_shaped(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    parts.len() == 3
        && parts[0].len() == 3
        && parts[1].len() == 2
        && parts[2].len() == 4
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
}

fn is_phone_shaped(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let other = value
        .chars()
        .filter(|c| !c.is_ascii_digit() && !matches!(c, ' ' | '-' | '.' | '(' | ')' | '+'))
        .count();
    other == 0 && (10..=13).contains(&digits)
}

fn is_address_shaped(value: &str) -> bool {
    let mut tokens = value.split_whitespace();
    matches!(tokens.next(), Some(first) if first.chars().all(|c| c.is_ascii_digit()))
        && tokens.next().is_some()
}

fn is_name_shaped(value: &str) -> bool {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    (2..=4).contains(&tokens.len())
        && tokens.iter().all(|t| {
            let mut chars = t.chars();
            matches!(chars.next(), Some(c) if c.is_uppercase())
                && t.chars().all(|c| c.is_alphabetic() || matches!(c, '\'' | '-'))
        })
}

fn parse_loose_date(value: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Generate a category-plausible synthetic replacement
///
/// Not length- or format-exact; the output is shaped like the detected
/// category (a real-looking email for emails, a name for names, ...).
pub fn substitute_fake(value: &str, rng: &mut StdRng) -> String {
    match detect_shape(value) {
        ValueShape::Email => {
            let first = pick(FIRST_NAMES, rng).to_lowercase();
            let last = pick(LAST_NAMES, rng).to_lowercase();
            let domain = pick(EMAIL_DOMAINS, rng);
            format!("{first}.{last}@{domain}")
        }
        ValueShape::Name => {
            format!("{} {}", pick(FIRST_NAMES, rng), pick(LAST_NAMES, rng))
        }
        ValueShape::Phone => format!(
            "({}) 555-{:04}",
            rng.gen_range(200..=989),
            rng.gen_range(0..=9999)
        ),
        ValueShape::Address => format!(
            "{} {} {}",
            rng.gen_range(1..=9999),
            pick(STREET_NAMES, rng),
            pick(STREET_TYPES, rng)
        ),
        ValueShape::Ssn => format!(
            "{:03}-{:02}-{:04}",
            rng.gen_range(100..=899),
            rng.gen_range(10..=99),
            rng.gen_range(1000..=9999)
        ),
        ValueShape::Date => {
            let year = rng.gen_range(1950..=2005);
            let month = rng.gen_range(1..=12);
            let day = rng.gen_range(1..=28);
            format!("{year:04}-{month:02}-{day:02}")
        }
        ValueShape::Generic => random_alphanumeric(value.chars().count().max(1), rng),
    }
}

/// Replace characters with random ones
///
/// With `preserve_format`, letters (ASCII or not) map to random ASCII
/// letters with case kept and digits to random digits, leaving
/// punctuation in place; otherwise the result is random alphanumeric of
/// the same length. No alphanumeric character of the original survives.
pub fn substitute_random(value: &str, preserve_format: bool, rng: &mut StdRng) -> String {
    if !preserve_format {
        return random_alphanumeric(value.chars().count(), rng);
    }

    value
        .chars()
        .map(|c| {
            if c.is_numeric() {
                char::from(b'0' + rng.gen_range(0..10u8))
            } else if c.is_alphabetic() {
                if c.is_uppercase() {
                    char::from(b'A' + rng.gen_range(0..26u8))
                } else {
                    char::from(b'a' + rng.gen_range(0..26u8))
                }
            } else {
                c
            }
        })
        .collect()
}

fn random_alphanumeric(len: usize, rng: &mut StdRng) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect()
}

fn pick<'a>(options: &'a [&'a str], rng: &mut StdRng) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use test_case::test_case;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test_case("jane.doe@example.com", ValueShape::Email; "email")]
    #[test_case("Jane Doe", ValueShape::Name; "name")]
    #[test_case("(555) 123-4567", ValueShape::Phone; "phone")]
    #[test_case("123-45-6789", ValueShape::Ssn; "ssn")]
    #[test_case("1984-02-11", ValueShape::Date; "iso date")]
    #[test_case("123 Main Street", ValueShape::Address; "address")]
    #[test_case("blue", ValueShape::Generic; "generic word")]
    fn test_detect_shape(value: &str, expected: ValueShape) {
        assert_eq!(detect_shape(value), expected);
    }

    #[test]
    fn test_fake_email_is_email_shaped() {
        let fake = substitute_fake("jane.doe@example.com", &mut rng());
        assert!(fake.contains('@'));
        assert_ne!(fake, "jane.doe@example.com");
    }

    #[test]
    fn test_fake_ssn_is_ssn_shaped() {
        let fake = substitute_fake("123-45-6789", &mut rng());
        assert!(is_ssn_shaped(&fake));
    }

    #[test]
    fn test_fake_is_seed_deterministic() {
        let a = substitute_fake("jane.doe@example.com", &mut StdRng::seed_from_u64(7));
        let b = substitute_fake("jane.doe@example.com", &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_preserves_format() {
        let out = substitute_random("AB-12 cd", true, &mut rng());
        assert_eq!(out.len(), 8);
        assert_eq!(&out[2..3], "-");
        assert_eq!(&out[5..6], " ");
        assert!(out.chars().take(2).all(|c| c.is_ascii_uppercase()));
        assert!(out.chars().skip(3).take(2).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_random_replaces_non_ascii_letters() {
        let out = substitute_random("José Müller", true, &mut rng());
        let chars: Vec<char> = out.chars().collect();
        assert_eq!(chars.len(), 11);
        assert_eq!(chars[4], ' ');
        // Accented letters are replaced too, with case preserved
        assert!(chars.iter().all(|c| c.is_ascii_alphabetic() || *c == ' '));
        assert!(chars[0].is_ascii_uppercase());
        assert!(chars[5].is_ascii_uppercase());
        assert!(chars[1..4].iter().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_without_format_is_same_length() {
        let out = substitute_random("AB-12 cd", false, &mut rng());
        assert_eq!(out.chars().count(), 8);
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generic_preserves_length() {
        let out = substitute_fake("abcdef", &mut rng());
        assert_eq!(out.chars().count(), 6);
    }
}
