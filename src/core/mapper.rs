//! Field mapper: projects a normalized line into a destination row.

use crate::domain::model::{Advisory, DestinationRow, FieldConstants, NormalizedLine, OrderLine};
use crate::domain::ports::{DestinationShape, FieldSource};
use regex::Regex;
use std::sync::LazyLock;

static PO_BOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:post(?:al)? (?:office )?|p[. ]?o\.? )?box").expect("PO box pattern is valid")
});

/// Searches for a PO box mention anywhere in `text`.
///
/// The match is not word-bounded, so street names such as "Boxwood" are flagged as well.
pub fn is_po_box(text: &str) -> bool {
    PO_BOX.is_match(text)
}

/// Strips `(`, `)`, spaces and hyphens; an 11 character result loses its leading country digit.
pub fn normalize_phone(raw: &str) -> String {
    let phone: String = raw
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ' ' | '-'))
        .collect();

    if phone.chars().count() == 11 {
        phone.chars().skip(1).collect()
    } else {
        phone
    }
}

pub fn pad_zip(zip: &str) -> String {
    if zip.is_empty() {
        return String::new();
    }
    format!("{:0>5}", zip)
}

/// Row advisories for one source line, independent of the destination.
pub fn line_advisories(line: &OrderLine) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if !line.risk_level.is_low() {
        advisories.push(Advisory::RiskLevel {
            order_id: line.order_id.clone(),
            level: line.risk_level.to_string(),
        });
    }

    if is_po_box(&line.shipping.address1) || is_po_box(&line.shipping.address2) {
        advisories.push(Advisory::PoBox {
            order_id: line.order_id.clone(),
        });
    }

    let digits = normalize_phone(&line.shipping.phone).chars().count();
    if !(10..=11).contains(&digits) {
        advisories.push(Advisory::PhoneDigits {
            order_id: line.order_id.clone(),
            digits,
        });
    }

    advisories
}

pub fn project(
    normalized: &NormalizedLine<'_>,
    shape: &dyn DestinationShape,
    constants: &FieldConstants,
) -> DestinationRow {
    let line = normalized.line;
    let shipping = &line.shipping;
    let business = &constants.business;
    let carrier = &constants.carrier;

    let cells = shape
        .fields()
        .iter()
        .map(|field| {
            let value = match field.source {
                FieldSource::OrderId => line.order_id.clone(),
                FieldSource::Sku => normalized.canonical_sku.clone(),
                FieldSource::Quantity => line.quantity.to_string(),
                FieldSource::Name => shipping.name.trim().to_string(),
                FieldSource::Address1 => shipping.address1.clone(),
                FieldSource::Address2 => shipping.address2.clone(),
                FieldSource::City => shipping.city.trim().to_string(),
                FieldSource::State => shipping.state.trim().to_string(),
                FieldSource::Country => shipping.country.trim().to_string(),
                FieldSource::Zip if shape.pads_zip() => pad_zip(&shipping.zip),
                FieldSource::Zip => shipping.zip.clone(),
                FieldSource::Phone => normalize_phone(&shipping.phone),
                FieldSource::Email => shipping.email.clone(),
                FieldSource::CustomerCode => business.customer_code.clone(),
                FieldSource::SalesChannel => business.sales_channel.clone(),
                FieldSource::WarehouseCode => business.warehouse_code.clone(),
                FieldSource::CargoOwnerCode => business.cargo_owner_code.clone(),
                FieldSource::UnitPrice => business.unit_price.clone(),
                FieldSource::OrderType => business.order_type.clone(),
                FieldSource::ShipCarrier => carrier.ship_carrier.clone(),
                FieldSource::ShipService => carrier.ship_service.clone(),
                FieldSource::Literal(text) => text.to_string(),
                FieldSource::Blank => String::new(),
            };
            (field.name.to_string(), value)
        })
        .collect();

    DestinationRow {
        order_id: line.order_id.clone(),
        cells,
    }
}
