use crate::domain::ident::Identifier;
use crate::domain::phone::{normalize_phone, CanonicalPhone};
use crate::domain::variants::{expand, PhoneVariants};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// Cell text as read from the sheet.
    pub raw: String,
    pub canonical: CanonicalPhone,
}

impl PhoneNumber {
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = normalize_phone(raw)?;
        Some(Self {
            raw: raw.to_string(),
            canonical,
        })
    }

    pub fn from_canonical(canonical: CanonicalPhone) -> Self {
        Self {
            raw: canonical.as_str().to_string(),
            canonical,
        }
    }

    pub fn variants(&self) -> PhoneVariants {
        expand(&self.raw, &self.canonical)
    }
}

/// Everything one run needs: where to write, what to write, which rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub table: String,
    pub phone_column: String,
    pub update_column: String,
    pub update_value: String,
    pub phones: Vec<PhoneNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNames {
    pub table: Identifier,
    pub phone_column: Identifier,
    pub update_column: Identifier,
}

impl UpdateRequest {
    pub fn validate(&self) -> Result<ValidatedNames, CoreError> {
        let names = ValidatedNames {
            table: Identifier::parse("table", &self.table)?,
            phone_column: Identifier::parse("phone column", &self.phone_column)?,
            update_column: Identifier::parse("update column", &self.update_column)?,
        };
        if self.update_value.is_empty() {
            return Err(CoreError::EmptyUpdateValue);
        }
        if self.phones.is_empty() {
            return Err(CoreError::NoPhoneNumbersFound);
        }
        Ok(names)
    }
}
