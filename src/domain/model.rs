use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment state of the order a line belongs to. Only `Paid` lines are converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        if raw == "paid" {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Other(raw.to_string())
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Anything the export wrote that is not one of the three known levels (including blank).
    Unrecognized(String),
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Low" => RiskLevel::Low,
            "Medium" => RiskLevel::Medium,
            "High" => RiskLevel::High,
            other => RiskLevel::Unrecognized(other.to_string()),
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, RiskLevel::Low)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("Low"),
            RiskLevel::Medium => f.write_str("Medium"),
            RiskLevel::High => f.write_str("High"),
            RiskLevel::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

/// Shipping address block of an order line. Missing columns are read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub email: String,
}

/// One line item of a source order, immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: String,
    pub sku: String,
    pub quantity: u32,
    pub payment_status: PaymentStatus,
    pub risk_level: RiskLevel,
    pub shipping: ShippingAddress,
}

/// SKU ruleset applied to a run. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    None,
    Mats,
    Balls,
    Playpens,
    Accessories,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::None => "none",
            FilterMode::Mats => "mats",
            FilterMode::Balls => "balls",
            FilterMode::Playpens => "playpens",
            FilterMode::Accessories => "accessories",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kept order line with its canonical SKU substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine<'a> {
    pub canonical_sku: String,
    pub line: &'a OrderLine,
}

impl NormalizedLine<'_> {
    pub fn order_id(&self) -> &str {
        &self.line.order_id
    }
}

/// One output record, as ordered (column, value) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRow {
    pub order_id: String,
    pub cells: Vec<(String, String)>,
}

impl DestinationRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }
}

/// Shipping tier picked for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceTier {
    #[serde(rename = "Surepost_under1lb")]
    SurepostUnder1lb,
    #[serde(rename = "Surepost_over1lb")]
    SurepostOver1lb,
    #[serde(rename = "UPS_ground")]
    UpsGround,
}

impl ServiceTier {
    /// Service product code understood by the JD import.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceTier::SurepostUnder1lb => "SPB9900hf",
            ServiceTier::SurepostOver1lb => "SPB9900he",
            ServiceTier::UpsGround => "SPB99008u",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServiceTier::SurepostUnder1lb => "Surepost_under1lb",
            ServiceTier::SurepostOver1lb => "Surepost_over1lb",
            ServiceTier::UpsGround => "UPS_ground",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAssignment {
    pub order_id: String,
    pub tier: ServiceTier,
    pub code: String,
}

/// Non-fatal findings. They never change the output; they flag rows for a human.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    RiskLevel { order_id: String, level: String },
    PoBox { order_id: String },
    PhoneDigits { order_id: String, digits: usize },
    QuantityAboveOne { order_id: String, quantity: u32 },
    ManualServiceReview { order_id: String, items: Vec<String> },
}

impl Advisory {
    pub fn order_id(&self) -> &str {
        match self {
            Advisory::RiskLevel { order_id, .. }
            | Advisory::PoBox { order_id }
            | Advisory::PhoneDigits { order_id, .. }
            | Advisory::QuantityAboveOne { order_id, .. }
            | Advisory::ManualServiceReview { order_id, .. } => order_id,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::RiskLevel { order_id, level } => write!(
                f,
                "Order {} has a \"{}\" risk level, make sure it should be imported and not deleted",
                order_id, level
            ),
            Advisory::PoBox { order_id } => write!(
                f,
                "Order {} ships to a PO box, which cannot be shipped to. Fix it before importing",
                order_id
            ),
            Advisory::PhoneDigits { order_id, digits } => write!(
                f,
                "Check the phone number of order {}, it has {} digits",
                order_id, digits
            ),
            Advisory::QuantityAboveOne { order_id, quantity } => write!(
                f,
                "Order {} has a line with quantity {}, the generated shipping service may need to change",
                order_id, quantity
            ),
            Advisory::ManualServiceReview { order_id, items } => write!(
                f,
                "Double check order {} ({}): UPS ground was picked but the parcel may be over 10lbs",
                order_id,
                items.join(", ")
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub lines_read: usize,
    pub lines_unpaid: usize,
    pub lines_filtered: usize,
    pub rows_emitted: usize,
}

/// Output of one conversion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub shape: String,
    pub columns: Vec<String>,
    pub rows: Vec<DestinationRow>,
    /// Present only for destinations that classify shipping services.
    pub services: Option<Vec<ServiceAssignment>>,
    pub advisories: Vec<Advisory>,
    pub stats: ConversionStats,
}

/// Fixed business fields the warehouse import expects on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessConstants {
    pub customer_code: String,
    pub sales_channel: String,
    pub warehouse_code: String,
    pub cargo_owner_code: String,
    pub unit_price: String,
    pub order_type: String,
}

impl Default for BusinessConstants {
    fn default() -> Self {
        Self {
            customer_code: "KH20000001629".to_string(),
            sales_channel: "Playpen Elite".to_string(),
            warehouse_code: "C0000000579".to_string(),
            cargo_owner_code: "19916".to_string(),
            unit_price: "1".to_string(),
            order_type: "1".to_string(),
        }
    }
}

/// Carrier text constants for destinations that rate-shop on import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierConstants {
    pub ship_carrier: String,
    pub ship_service: String,
}

impl Default for CarrierConstants {
    fn default() -> Self {
        Self {
            ship_carrier: "RateShop".to_string(),
            ship_service: "RateShop w/SmartPost- RS01".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConstants {
    pub business: BusinessConstants,
    pub carrier: CarrierConstants,
}
