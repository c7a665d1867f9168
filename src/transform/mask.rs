//! Masking techniques
//!
//! Both maskers preserve the input length in characters so downstream
//! layout and width expectations still hold.

/// Replace the middle of a value with `*`, keeping roughly the first
/// and last 20% of characters
///
/// Values of length <= 2 are fully masked; length <= 4 keeps only the
/// first and last character.
pub fn mask_partial(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len == 0 {
        return String::new();
    }
    if len <= 2 {
        return "*".repeat(len);
    }

    let keep = if len <= 4 { 1 } else { ((len as f64) * 0.2).floor() as usize };
    let keep = keep.max(1);

    let mut masked = String::with_capacity(len);
    for (i, c) in chars.iter().enumerate() {
        if i < keep || i >= len - keep {
            masked.push(*c);
        } else {
            masked.push('*');
        }
    }
    masked
}

/// Replace every character with `*`
pub fn mask_full(value: &str) -> String {
    "*".repeat(value.chars().count())
}
