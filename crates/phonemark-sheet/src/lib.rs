pub mod error;

pub use error::{Result, SheetError};

use calamine::{open_workbook_auto, Data, Reader};
use phonemark_core::{CoreError, RawPhoneValue};
use std::path::Path;
use tracing::debug;

/// How rows are laid out at the top of the sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetOptions {
    /// Zero-based header row. `None` means the sheet has no header.
    pub header_row: Option<usize>,
    /// Rows to skip before data when there is no header.
    pub start_row: usize,
}

impl SheetOptions {
    pub fn new(has_header: bool, start_row: usize) -> Self {
        Self {
            header_row: has_header.then_some(start_row),
            start_row,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawPhoneValue>>,
}

impl SheetTable {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_name(&self, index: usize) -> Result<&str> {
        self.columns
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Values of one column in row order.
    pub fn column_values(&self, index: usize) -> Result<Vec<RawPhoneValue>> {
        if index >= self.columns.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or(RawPhoneValue::Empty))
            .collect())
    }

    fn out_of_range(&self, index: usize) -> SheetError {
        CoreError::ColumnOutOfRange {
            index,
            count: self.columns.len(),
        }
        .into()
    }
}

/// Reads the first worksheet of an xlsx, xlsm, xls or ods file.
pub fn read_sheet(path: &Path, options: &SheetOptions) -> Result<SheetTable> {
    if !path.is_file() {
        return Err(SheetError::MissingFile(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet(path.to_path_buf()))?
        .map_err(|source| SheetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    // Ranges start at the first used cell; pad back to sheet coordinates.
    let (top, left) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let mut grid: Vec<Vec<RawPhoneValue>> = vec![Vec::new(); top];
    for row in range.rows() {
        let mut cells = vec![RawPhoneValue::Empty; left];
        cells.extend(row.iter().map(cell_value));
        grid.push(cells);
    }

    debug!(path = %path.display(), rows = grid.len(), "spreadsheet loaded");
    build_table(grid, options)
}

/// Applies header and skip-row options to a grid addressed from the sheet's top row.
pub fn build_table(grid: Vec<Vec<RawPhoneValue>>, options: &SheetOptions) -> Result<SheetTable> {
    let total = grid.len();
    let (header, data) = match options.header_row {
        Some(row) => {
            if row >= total {
                return Err(SheetError::MissingHeaderRow { row, rows: total });
            }
            let mut rows = grid.into_iter().skip(row);
            let header = rows.next();
            (header, rows.collect::<Vec<_>>())
        }
        None => (None, grid.into_iter().skip(options.start_row).collect()),
    };

    let width = data
        .iter()
        .map(Vec::len)
        .chain(header.as_ref().map(Vec::len))
        .max()
        .unwrap_or(0);

    let columns = (0..width)
        .map(|index| match header.as_ref().and_then(|cells| cells.get(index)) {
            Some(RawPhoneValue::Empty) | None if header.is_some() => format!("Unnamed: {index}"),
            Some(cell) => cell.to_string(),
            None => index.to_string(),
        })
        .collect();

    let rows = data
        .into_iter()
        .map(|mut row| {
            row.resize(width, RawPhoneValue::Empty);
            row
        })
        .collect();

    Ok(SheetTable { columns, rows })
}

fn cell_value(cell: &Data) -> RawPhoneValue {
    match cell {
        Data::Empty | Data::Error(_) => RawPhoneValue::Empty,
        Data::String(value) if value.trim().is_empty() => RawPhoneValue::Empty,
        Data::String(value) => RawPhoneValue::Text(value.clone()),
        Data::Int(value) => RawPhoneValue::Int(*value),
        Data::Float(value) => RawPhoneValue::Float(*value),
        Data::Bool(value) => RawPhoneValue::Bool(*value),
        Data::DateTime(value) => RawPhoneValue::Text(value.to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => RawPhoneValue::Text(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_table, SheetError, SheetOptions};
    use phonemark_core::{CoreError, RawPhoneValue};

    fn text(value: &str) -> RawPhoneValue {
        RawPhoneValue::from(value)
    }

    fn grid() -> Vec<Vec<RawPhoneValue>> {
        vec![
            vec![text("customer list")],
            vec![text("name"), text("phone")],
            vec![text("Ada"), text("010-1111-2222")],
            vec![text("Grace"), text("010-3333-4444"), text("vip")],
        ]
    }

    #[test]
    fn header_row_names_columns() {
        let table = build_table(grid(), &SheetOptions::new(true, 1)).expect("table");
        assert_eq!(table.columns, vec!["name", "phone", "Unnamed: 2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.column_values(1).expect("column"),
            vec![text("010-1111-2222"), text("010-3333-4444")]
        );
        assert_eq!(table.rows[0][2], RawPhoneValue::Empty);
    }

    #[test]
    fn without_header_columns_are_numbered() {
        let table = build_table(grid(), &SheetOptions::new(false, 2)).expect("table");
        assert_eq!(table.columns, vec!["0", "1", "2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_name(1).expect("name"), "1");
    }

    #[test]
    fn out_of_range_column_is_a_core_error() {
        let table = build_table(grid(), &SheetOptions::new(true, 1)).expect("table");
        let err = table.column_values(5).unwrap_err();
        assert!(matches!(
            err,
            SheetError::Core(CoreError::ColumnOutOfRange { index: 5, count: 3 })
        ));
    }

    #[test]
    fn header_past_end_is_rejected() {
        let err = build_table(grid(), &SheetOptions::new(true, 9)).unwrap_err();
        assert!(matches!(err, SheetError::MissingHeaderRow { row: 9, rows: 4 }));
    }

    #[test]
    fn skipping_every_row_leaves_an_empty_table() {
        let table = build_table(grid(), &SheetOptions::new(false, 10)).expect("table");
        assert_eq!(table.column_count(), 0);
        assert_eq!(table.row_count(), 0);
    }
}
