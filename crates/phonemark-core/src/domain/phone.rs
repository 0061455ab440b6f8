use serde::Serialize;
use std::fmt;

const COUNTRY_PREFIX: &str = "82";

/// A single spreadsheet cell taken from the phone column.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPhoneValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl RawPhoneValue {
    /// Text form of the cell, or `None` for cells that can never hold a number.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawPhoneValue::Empty | RawPhoneValue::Bool(_) => None,
            RawPhoneValue::Text(value) => Some(value.clone()),
            RawPhoneValue::Int(value) => Some(value.to_string()),
            RawPhoneValue::Float(value) => Some(float_text(*value)),
        }
    }
}

impl fmt::Display for RawPhoneValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPhoneValue::Empty => Ok(()),
            RawPhoneValue::Bool(value) => write!(f, "{value}"),
            other => f.write_str(&other.as_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for RawPhoneValue {
    fn from(value: &str) -> Self {
        RawPhoneValue::Text(value.to_string())
    }
}

impl From<Option<&str>> for RawPhoneValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(RawPhoneValue::Empty, RawPhoneValue::from)
    }
}

// Numeric cells lose their trailing ".0" so whole numbers keep only their digits.
// Any leading zero was dropped by the spreadsheet itself; `preview` counts these cells.
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Digit-only phone number used as the matching key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn normalize(raw: &RawPhoneValue) -> Option<CanonicalPhone> {
    normalize_phone(&raw.as_text()?)
}

/// Keeps only ASCII digits and rewrites a leading `82` country code to `0`.
///
/// The rewrite fires on any digit string that starts with `82`, including
/// domestic numbers that merely begin with those digits.
pub fn normalize_phone(value: &str) -> Option<CanonicalPhone> {
    let digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    match digits.strip_prefix(COUNTRY_PREFIX) {
        Some(rest) => Some(CanonicalPhone(format!("0{rest}"))),
        None => Some(CanonicalPhone(digits)),
    }
}
