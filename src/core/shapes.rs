use crate::domain::model::ServiceAssignment;
use crate::domain::ports::{DestinationShape, FieldSource, FieldSpec, HeaderGroup};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub const JD_ORDER_SHEET: &str = "Outbound Order Info";
pub const JD_SERVICE_SHEET: &str = "Service Product Info";

pub const SERVICE_CUSTOMER_CODE: &str = "*Customer Code";
pub const SERVICE_ORDER_NO: &str = "*Customer Order No.";
pub const SERVICE_PRODUCT_CODE: &str = "Service Product Code";

static JD_FIELDS: [FieldSpec; 20] = [
    FieldSpec::new("*Customer Code", FieldSource::CustomerCode),
    FieldSpec::new("*Customer Order No.", FieldSource::OrderId),
    FieldSpec::new("* Sales Channel No.", FieldSource::SalesChannel),
    FieldSpec::new("*Sales Channel SO No.", FieldSource::OrderId),
    FieldSpec::number("*Cargo Owner Code", FieldSource::CargoOwnerCode),
    FieldSpec::new("*Warehouse Code", FieldSource::WarehouseCode),
    FieldSpec::number(
        "*Order Type\n1-B2C；2-B2B；\n3-WarehouseOnly",
        FieldSource::OrderType,
    ),
    FieldSpec::new("*Consignee Name", FieldSource::Name),
    FieldSpec::new("*Consignee Country", FieldSource::Country),
    FieldSpec::new("*Consignee State/Province", FieldSource::State),
    FieldSpec::new("*Consignee City", FieldSource::City),
    FieldSpec::new("*Consignee District/County", FieldSource::Literal("US")),
    FieldSpec::new("*Consignee Postcode", FieldSource::Zip),
    FieldSpec::new("*Consignee Address1", FieldSource::Address1),
    FieldSpec::new("Consignee Address2", FieldSource::Address2),
    FieldSpec::new("*Mobile", FieldSource::Phone),
    FieldSpec::new("*Customer SKU ID", FieldSource::Sku),
    FieldSpec::number("*Quantity", FieldSource::Quantity),
    FieldSpec::number("*Price", FieldSource::UnitPrice),
    // always piece-level, orders are B2C
    FieldSpec::number(
        "*Outbound Unit\n1-piece；2-Box；3-Pallet",
        FieldSource::Literal("1"),
    ),
];

static JD_GROUPS: [HeaderGroup; 3] = [
    HeaderGroup {
        title: Cow::Borrowed("Outbound Order Info"),
        span: 7,
    },
    HeaderGroup {
        title: Cow::Borrowed("Consignee Info"),
        span: 9,
    },
    HeaderGroup {
        title: Cow::Borrowed("Product Info"),
        span: 4,
    },
];

/// The service title is merged over C-F, wider than the one product column below it.
static JD_SERVICE_GROUPS: [HeaderGroup; 2] = [
    HeaderGroup {
        title: Cow::Borrowed("Outbound Order Info"),
        span: 2,
    },
    HeaderGroup {
        title: Cow::Borrowed("Service Product Info"),
        span: 4,
    },
];

const SERVICE_COLUMNS: [&str; 3] = [SERVICE_CUSTOMER_CODE, SERVICE_ORDER_NO, SERVICE_PRODUCT_CODE];

static VERDE_FIELDS: [FieldSpec; 14] = [
    FieldSpec::new("ReferenceNumber", FieldSource::OrderId),
    FieldSpec::new("ShipCarrier", FieldSource::ShipCarrier),
    FieldSpec::new("ShipService", FieldSource::ShipService),
    FieldSpec::new("ShipTo Name", FieldSource::Name),
    FieldSpec::new("ShipToAddress1", FieldSource::Address1),
    FieldSpec::new("ShipToAddress2", FieldSource::Address2),
    FieldSpec::new("ShipToCity", FieldSource::City),
    FieldSpec::new("ShipToState", FieldSource::State),
    FieldSpec::new("ShipToZip", FieldSource::Zip),
    FieldSpec::new("ShipToCountry", FieldSource::Country),
    FieldSpec::new("ShipToPhone", FieldSource::Phone),
    FieldSpec::new("ShipToEmail", FieldSource::Email),
    FieldSpec::new("SKU", FieldSource::Sku),
    FieldSpec::new("Quantity", FieldSource::Quantity),
];

/// JD outbound order workbook. Orders are also classified into service tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdShape;

impl DestinationShape for JdShape {
    fn name(&self) -> &str {
        "jd"
    }

    fn fields(&self) -> &[FieldSpec] {
        &JD_FIELDS
    }

    fn header_groups(&self) -> &[HeaderGroup] {
        &JD_GROUPS
    }

    fn classifies_service(&self) -> bool {
        true
    }
}

/// Verde order import, a headerless tab-separated file.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerdeShape;

impl DestinationShape for VerdeShape {
    fn name(&self) -> &str {
        "verde"
    }

    fn fields(&self) -> &[FieldSpec] {
        &VERDE_FIELDS
    }

    fn pads_zip(&self) -> bool {
        true
    }

    fn headerless(&self) -> bool {
        true
    }
}

/// Column names of a template sheet together with the merged titles above them.
///
/// A titled cell in the title row starts a group that runs until the next titled cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub columns: Vec<String>,
    /// Index into `titles` of the group above each column, `None` before the first title.
    membership: Vec<Option<usize>>,
    titles: Vec<String>,
}

impl SheetLayout {
    pub fn new(columns: Vec<String>, title_row: &[String]) -> Self {
        let mut titles = Vec::new();
        let mut membership = Vec::with_capacity(columns.len());
        let mut current = None;

        for col in 0..columns.len() {
            if let Some(title) = title_row.get(col).filter(|t| !t.trim().is_empty()) {
                titles.push(title.clone());
                current = Some(titles.len() - 1);
            }
            membership.push(current);
        }

        Self {
            columns,
            membership,
            titles,
        }
    }

    /// Drops columns with an empty name; their groups shrink accordingly.
    pub fn without_blank_columns(&self) -> Self {
        let (columns, membership) = self
            .columns
            .iter()
            .zip(&self.membership)
            .filter(|(column, _)| !column.trim().is_empty())
            .map(|(column, member)| (column.clone(), *member))
            .unzip();

        Self {
            columns,
            membership,
            titles: self.titles.clone(),
        }
    }

    pub fn has_titles(&self) -> bool {
        self.membership.iter().any(Option::is_some)
    }

    /// Consecutive groups over the columns. Untitled runs come back with an empty title.
    pub fn header_groups(&self) -> Vec<HeaderGroup> {
        self.membership
            .chunk_by(|a, b| a == b)
            .map(|run| HeaderGroup {
                title: match run[0] {
                    Some(idx) => Cow::Owned(self.titles[idx].clone()),
                    None => Cow::Borrowed(""),
                },
                span: run.len(),
            })
            .collect()
    }
}

/// A shape whose column order comes from a warehouse template's header row.
///
/// Template columns the base shape does not know stay blank; base fields missing from
/// the template are appended after the template columns. Headerless shapes keep empty
/// template columns in place, the others drop them.
pub struct TemplateShape {
    base: Box<dyn DestinationShape>,
    fields: Vec<FieldSpec>,
    header_groups: Vec<HeaderGroup>,
}

impl TemplateShape {
    pub fn new(base: Box<dyn DestinationShape>, layout: &SheetLayout) -> Self {
        let layout = if base.headerless() {
            layout.clone()
        } else {
            layout.without_blank_columns()
        };

        let mut fields: Vec<FieldSpec> = layout
            .columns
            .iter()
            .map(|column| {
                let name = Cow::Owned(column.clone());
                match base.fields().iter().find(|f| f.name == column.as_str()) {
                    Some(field) => FieldSpec {
                        name,
                        ..field.clone()
                    },
                    None => FieldSpec {
                        name,
                        source: FieldSource::Blank,
                        numeric: false,
                    },
                }
            })
            .collect();

        for field in base.fields() {
            if !fields.iter().any(|f| f.name == field.name) {
                tracing::debug!("Template has no column '{}', appending it", field.name);
                fields.push(field.clone());
            }
        }

        let header_groups = if base.header_groups().is_empty() {
            Vec::new()
        } else if layout.has_titles() {
            layout.header_groups()
        } else {
            tracing::debug!("Template has no title row, keeping the built-in header groups");
            base.header_groups().to_vec()
        };

        Self {
            base,
            fields,
            header_groups,
        }
    }
}

impl DestinationShape for TemplateShape {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn header_groups(&self) -> &[HeaderGroup] {
        &self.header_groups
    }

    fn pads_zip(&self) -> bool {
        self.base.pads_zip()
    }

    fn headerless(&self) -> bool {
        self.base.headerless()
    }

    fn classifies_service(&self) -> bool {
        self.base.classifies_service()
    }
}

/// Columns and merged titles of the JD service sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSheet {
    pub columns: Vec<String>,
    pub groups: Vec<HeaderGroup>,
}

impl Default for ServiceSheet {
    fn default() -> Self {
        Self {
            columns: SERVICE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            groups: JD_SERVICE_GROUPS.to_vec(),
        }
    }
}

impl ServiceSheet {
    /// Service sheet laid out like the template's; required columns it lacks are appended.
    pub fn from_template(layout: &SheetLayout) -> Self {
        let layout = layout.without_blank_columns();
        let groups = if layout.has_titles() {
            layout.header_groups()
        } else {
            JD_SERVICE_GROUPS.to_vec()
        };

        let mut columns = layout.columns;
        for column in SERVICE_COLUMNS {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }

        Self { columns, groups }
    }

    pub fn value<'a>(
        &self,
        column: &str,
        customer_code: &'a str,
        service: &'a ServiceAssignment,
    ) -> &'a str {
        match column {
            SERVICE_CUSTOMER_CODE => customer_code,
            SERVICE_ORDER_NO => &service.order_id,
            SERVICE_PRODUCT_CODE => &service.code,
            _ => "",
        }
    }
}

/// Warehouse system the export is converted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Jd,
    Verde,
}

impl Target {
    pub fn shape(&self) -> Box<dyn DestinationShape> {
        match self {
            Target::Jd => Box::new(JdShape),
            Target::Verde => Box::new(VerdeShape),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Jd => "jd",
            Target::Verde => "verde",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Target::Jd => "xlsx",
            Target::Verde => "txt",
        }
    }

    /// Template sheet holding the column header row. `None` means the first sheet.
    pub fn template_sheet(&self) -> Option<&'static str> {
        match self {
            Target::Jd => Some(JD_ORDER_SHEET),
            Target::Verde => None,
        }
    }

    /// Template sheet describing the service sheet, for targets that write one.
    pub fn template_service_sheet(&self) -> Option<&'static str> {
        match self {
            Target::Jd => Some(JD_SERVICE_SHEET),
            Target::Verde => None,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
