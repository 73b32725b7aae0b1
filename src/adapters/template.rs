//! Reads column layouts out of a warehouse template workbook.

use crate::core::shapes::SheetLayout;
use crate::utils::error::{EtlError, Result};
use calamine::{DataType, Range, Reader, Xlsx};
use std::io::Cursor;

/// Merged group titles sit on the first row, column names on the second.
const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    pub orders: SheetLayout,
    /// Layout of the service sheet, when one was asked for and the template has it.
    pub services: Option<SheetLayout>,
}

/// Reads the order sheet (`None` means the first sheet) and the optional service sheet.
pub fn read_template(
    data: Vec<u8>,
    order_sheet: Option<&str>,
    service_sheet: Option<&str>,
) -> Result<TemplateLayout> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;

    let sheet_label = order_sheet.unwrap_or("<first sheet>");
    let range = match order_sheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    }
    .ok_or_else(|| EtlError::TemplateLayoutError {
        sheet: sheet_label.to_string(),
    })??;
    let orders = sheet_layout(&range, sheet_label)?;

    let services = match service_sheet {
        Some(name) => match workbook.worksheet_range(name) {
            Some(range) => Some(sheet_layout(&range?, name)?),
            None => {
                tracing::debug!("Template has no '{}' sheet, using the built-in layout", name);
                None
            }
        },
        None => None,
    };

    Ok(TemplateLayout { orders, services })
}

/// Header row cells keep their positions, empty ones included; trailing empties are cut.
fn sheet_layout(range: &Range<DataType>, sheet: &str) -> Result<SheetLayout> {
    let layout_error = || EtlError::TemplateLayoutError {
        sheet: sheet.to_string(),
    };
    let (_, last_col) = range.end().ok_or_else(layout_error)?;

    // absolute positions, the range itself starts at the first non-empty cell
    let row_cells = |row: u32| -> Vec<String> {
        (0..=last_col)
            .map(|col| range.get_value((row, col)).map(cell_to_string).unwrap_or_default())
            .collect()
    };

    let mut columns = row_cells(HEADER_ROW);
    while columns.last().is_some_and(|name| name.trim().is_empty()) {
        columns.pop();
    }
    if columns.is_empty() {
        return Err(layout_error());
    }

    tracing::debug!("Template sheet '{}' has {} header columns", sheet, columns.len());
    Ok(SheetLayout::new(columns, &row_cells(TITLE_ROW)))
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => value.to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Bool(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}
