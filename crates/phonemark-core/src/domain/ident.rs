use crate::error::CoreError;
use std::fmt;

/// A table or column name that is safe to interpolate into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// `kind` names the identifier in error messages ("table", "phone column").
    ///
    /// The value is taken as written: surrounding whitespace is rejected like
    /// any other character outside `[A-Za-z0-9_]`.
    pub fn parse(kind: &'static str, value: &str) -> Result<Self, CoreError> {
        if value.trim().is_empty() {
            return Err(CoreError::EmptyIdentifier(kind));
        }
        let starts_with_digit = value.starts_with(|ch: char| ch.is_ascii_digit());
        let allowed = value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if starts_with_digit || !allowed {
            return Err(CoreError::InvalidIdentifier {
                kind,
                value: value.to_string(),
            });
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
