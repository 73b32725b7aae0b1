//! JD import workbook writer.

use crate::core::shapes::{ServiceSheet, JD_ORDER_SHEET, JD_SERVICE_SHEET};
use crate::domain::model::Conversion;
use crate::domain::ports::{DestinationShape, HeaderGroup};
use crate::utils::error::Result;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

/// Builds the two-sheet JD workbook: merged group headers on row 1, column names on
/// row 2, data from row 3.
///
/// `shape` must be the shape `conversion` was built with; its numeric fields are
/// written as number cells.
pub fn write_jd_workbook(
    conversion: &Conversion,
    shape: &dyn DestinationShape,
    service_sheet: &ServiceSheet,
    customer_code: &str,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let merge_format = Format::new().set_align(FormatAlign::Center);

    let orders = workbook.add_worksheet();
    orders.set_name(JD_ORDER_SHEET)?;
    write_header_groups(orders, shape.header_groups(), &merge_format)?;
    write_row(orders, 1, conversion.columns.iter().map(String::as_str), &[])?;
    let numeric: Vec<bool> = shape.fields().iter().map(|f| f.numeric).collect();
    for (row_idx, row) in conversion.rows.iter().enumerate() {
        write_row(orders, (row_idx + 2) as u32, row.values(), &numeric)?;
    }

    let services = workbook.add_worksheet();
    services.set_name(JD_SERVICE_SHEET)?;
    write_header_groups(services, &service_sheet.groups, &merge_format)?;
    write_row(services, 1, service_sheet.columns.iter().map(String::as_str), &[])?;
    for (row_idx, service) in conversion.services.iter().flatten().enumerate() {
        let values = service_sheet
            .columns
            .iter()
            .map(|column| service_sheet.value(column, customer_code, service));
        write_row(services, (row_idx + 2) as u32, values, &[])?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Untitled groups leave their columns empty.
fn write_header_groups(
    worksheet: &mut Worksheet,
    groups: &[HeaderGroup],
    format: &Format,
) -> Result<()> {
    let mut first_col: u16 = 0;
    for group in groups.iter().filter(|g| g.span > 0) {
        let last_col = first_col + group.span as u16 - 1;
        if group.title.is_empty() {
            first_col = last_col + 1;
            continue;
        }
        if last_col == first_col {
            // single cells cannot be merged
            worksheet.write_string_with_format(0, first_col, group.title.as_ref(), format)?;
        } else {
            worksheet.merge_range(0, first_col, 0, last_col, group.title.as_ref(), format)?;
        }
        first_col = last_col + 1;
    }
    Ok(())
}

/// Columns flagged in `numeric` are written as numbers when the value parses as one.
fn write_row<'a>(
    worksheet: &mut Worksheet,
    row: u32,
    values: impl Iterator<Item = &'a str>,
    numeric: &[bool],
) -> Result<()> {
    for (col_idx, value) in values.enumerate() {
        if value.is_empty() {
            continue;
        }
        let col = col_idx as u16;
        let number = numeric
            .get(col_idx)
            .copied()
            .unwrap_or(false)
            .then(|| value.parse::<f64>().ok())
            .flatten()
            .filter(|n| n.is_finite());
        match number {
            Some(number) => worksheet.write_number(row, col, number)?,
            None => worksheet.write_string(row, col, value)?,
        };
    }
    Ok(())
}
