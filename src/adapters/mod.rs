// Adapters layer: file formats on either side of the conversion.

pub mod bundle;
pub mod shopify;
pub mod template;
pub mod tsv;
pub mod workbook;
