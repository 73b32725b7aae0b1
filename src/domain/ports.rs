use crate::domain::model::{Conversion, FieldConstants, OrderLine};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::borrow::Cow;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn constants(&self) -> &FieldConstants;
    fn filename_pattern(&self) -> Option<&str>;
    /// Name of the ZIP bundle to write next to the output, when bundling is enabled.
    fn bundle_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<OrderLine>>;
    async fn transform(&self, data: Vec<OrderLine>) -> Result<Conversion>;
    async fn load(&self, result: Conversion) -> Result<String>;
}

/// Where a destination column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    OrderId,
    Sku,
    Quantity,
    Name,
    Address1,
    Address2,
    City,
    State,
    Zip,
    Country,
    Phone,
    Email,
    CustomerCode,
    SalesChannel,
    WarehouseCode,
    CargoOwnerCode,
    UnitPrice,
    OrderType,
    ShipCarrier,
    ShipService,
    Literal(&'static str),
    /// Template column the shape has no value for.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: Cow<'static, str>,
    pub source: FieldSource,
    /// Written as a number cell by spreadsheet outputs.
    pub numeric: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, source: FieldSource) -> Self {
        Self {
            name: Cow::Borrowed(name),
            source,
            numeric: false,
        }
    }

    pub const fn number(name: &'static str, source: FieldSource) -> Self {
        Self {
            name: Cow::Borrowed(name),
            source,
            numeric: true,
        }
    }
}

/// A merged header cell spanning `span` columns above the column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub title: Cow<'static, str>,
    pub span: usize,
}

/// Field layout of one warehouse import format.
pub trait DestinationShape: Send + Sync {
    fn name(&self) -> &str;

    fn fields(&self) -> &[FieldSpec];

    /// Merged header row written above the column names. Empty for headerless formats.
    fn header_groups(&self) -> &[HeaderGroup] {
        &[]
    }

    fn pads_zip(&self) -> bool {
        false
    }

    /// Headerless formats are read by column position.
    fn headerless(&self) -> bool {
        false
    }

    /// Whether orders are aggregated into a shipping-service sheet.
    fn classifies_service(&self) -> bool {
        false
    }

    fn columns(&self) -> Vec<String> {
        self.fields().iter().map(|f| f.name.to_string()).collect()
    }
}
