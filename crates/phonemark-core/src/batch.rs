use crate::domain::phone::{normalize, RawPhoneValue};
use crate::request::PhoneNumber;
use std::collections::HashSet;

/// Phone numbers gathered from one spreadsheet column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneBatch {
    /// First occurrence of each canonical number, in sheet order.
    pub numbers: Vec<PhoneNumber>,
    /// Cells that held no digits.
    pub skipped: usize,
    /// Cells whose canonical number was already collected.
    pub duplicates: usize,
}

impl PhoneBatch {
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

pub fn collect_phone_numbers<I>(cells: I) -> PhoneBatch
where
    I: IntoIterator<Item = RawPhoneValue>,
{
    let mut batch = PhoneBatch::default();
    let mut seen = HashSet::new();

    for cell in cells {
        let Some(canonical) = normalize(&cell) else {
            batch.skipped += 1;
            continue;
        };
        if !seen.insert(canonical.clone()) {
            batch.duplicates += 1;
            continue;
        }
        let raw = cell.as_text().unwrap_or_default();
        batch.numbers.push(PhoneNumber { raw, canonical });
    }

    batch
}
