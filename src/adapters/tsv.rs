use crate::domain::model::Conversion;
use crate::utils::error::{EtlError, Result};

/// Headerless tab-separated rows, as the Verde import expects.
pub fn write_tsv(conversion: &Conversion) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(Vec::new());

    for row in &conversion.rows {
        writer.write_record(row.values())?;
    }

    writer.into_inner().map_err(|e| EtlError::IoError(e.into_error()))
}
