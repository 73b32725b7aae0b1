//! Shopify order export reader.

use crate::domain::model::{OrderLine, PaymentStatus, RiskLevel, ShippingAddress};
use crate::utils::error::{EtlError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ShopifyRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Financial Status")]
    financial_status: String,
    #[serde(rename = "Lineitem sku")]
    sku: String,
    #[serde(rename = "Lineitem quantity")]
    quantity: String,
    #[serde(rename = "Risk Level")]
    risk_level: Option<String>,
    #[serde(rename = "Shipping Name")]
    shipping_name: Option<String>,
    #[serde(rename = "Shipping Address1")]
    shipping_address1: Option<String>,
    #[serde(rename = "Shipping Address2")]
    shipping_address2: Option<String>,
    #[serde(rename = "Shipping City")]
    shipping_city: Option<String>,
    #[serde(rename = "Shipping Province")]
    shipping_province: Option<String>,
    #[serde(rename = "Shipping Zip")]
    shipping_zip: Option<String>,
    #[serde(rename = "Shipping Country")]
    shipping_country: Option<String>,
    #[serde(rename = "Shipping Phone")]
    shipping_phone: Option<String>,
    #[serde(rename = "Email")]
    email: Option<String>,
}

impl ShopifyRow {
    fn into_order_line(self, line: u64) -> Result<OrderLine> {
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .map_err(|e| EtlError::InvalidRecord {
                line,
                message: format!("Lineitem quantity '{}' is not a count: {}", self.quantity, e),
            })?;

        Ok(OrderLine {
            order_id: self.name,
            sku: self.sku,
            quantity,
            payment_status: PaymentStatus::parse(&self.financial_status),
            risk_level: RiskLevel::parse(self.risk_level.as_deref().unwrap_or_default()),
            shipping: ShippingAddress {
                name: self.shipping_name.unwrap_or_default(),
                address1: self.shipping_address1.unwrap_or_default(),
                address2: self.shipping_address2.unwrap_or_default(),
                city: self.shipping_city.unwrap_or_default(),
                state: self.shipping_province.unwrap_or_default(),
                zip: self.shipping_zip.unwrap_or_default(),
                country: self.shipping_country.unwrap_or_default(),
                phone: self.shipping_phone.unwrap_or_default(),
                email: self.email.unwrap_or_default(),
            },
        })
    }
}

/// Parses an order export, keeping source order. Columns not listed on `ShopifyRow` are ignored.
pub fn parse_orders(data: &[u8]) -> Result<Vec<OrderLine>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);
    let headers = reader.headers()?.clone();

    let mut lines = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: ShopifyRow = record.deserialize(Some(&headers))?;
        lines.push(row.into_order_line(line)?);
    }

    tracing::debug!("Parsed {} order lines", lines.len());
    Ok(lines)
}
