use crate::domain::phone::CanonicalPhone;

/// Textual encodings treated as the same phone number, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneVariants(Vec<String>);

impl PhoneVariants {
    fn push(&mut self, value: String) {
        if !value.is_empty() && !self.0.contains(&value) {
            self.0.push(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|item| item == value)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Canonical form first, then the hyphenated form, then the raw value with
/// separators removed when that differs from the canonical form.
pub fn expand(raw_original: &str, canonical: &CanonicalPhone) -> PhoneVariants {
    let mut variants = PhoneVariants::default();
    variants.push(canonical.as_str().to_string());
    if let Some(hyphenated) = hyphenate(canonical.as_str()) {
        variants.push(hyphenated);
    }
    let stripped = strip_separators(raw_original);
    if stripped != canonical.as_str() {
        variants.push(stripped);
    }
    variants
}

/// `ddd-ddd-dddd` for 10 digits, `ddd-dddd-dddd` for 11, nothing otherwise.
pub fn hyphenate(digits: &str) -> Option<String> {
    if !digits.is_ascii() {
        return None;
    }
    let split = match digits.len() {
        10 => 6,
        11 => 7,
        _ => return None,
    };
    Some(format!(
        "{}-{}-{}",
        &digits[..3],
        &digits[3..split],
        &digits[split..]
    ))
}

pub fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|ch| *ch != '-' && !ch.is_whitespace())
        .collect()
}
